// Licensed under the Apache-2.0 license

//! Read-only module/function lookup used by applications to interpret
//! bytes taken from the slave receive buffer.
//!
//! A table lists modules, each identified on the wire by an access id and
//! carrying a list of `(command, function)` pairs. On a target the table
//! lives in flash as `'static` data. The bus driver does not use it.

/// One command a module accepts and the function slot that serves it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FunctionEntry {
    pub command: u16,
    pub function: u16,
}

#[derive(Copy, Clone, Debug)]
pub struct ModuleEntry<'a> {
    pub access_id: u8,
    pub functions: &'a [FunctionEntry],
}

/// Indexed read access to a module table.
pub trait ModuleTable {
    fn module_count(&self) -> usize;

    /// Access id of the module at `index`.
    fn access_id(&self, index: usize) -> Option<u8>;

    /// Function list of the module at `index`.
    fn function_table(&self, index: usize) -> Option<&[FunctionEntry]>;

    /// Command of entry `entry` in module `index`.
    fn access_command(&self, index: usize, entry: usize) -> Option<u16> {
        self.function_table(index)?.get(entry).map(|e| e.command)
    }

    /// Function slot of entry `entry` in module `index`.
    fn access_function(&self, index: usize, entry: usize) -> Option<u16> {
        self.function_table(index)?.get(entry).map(|e| e.function)
    }

    /// Index of the module answering to `access_id`.
    fn find_module(&self, access_id: u8) -> Option<usize> {
        (0..self.module_count()).find(|&i| self.access_id(i) == Some(access_id))
    }

    /// Function slot for `command` in the module answering to `access_id`.
    fn resolve(&self, access_id: u8, command: u16) -> Option<u16> {
        let index = self.find_module(access_id)?;
        self.function_table(index)?
            .iter()
            .find(|e| e.command == command)
            .map(|e| e.function)
    }
}

/// Table backed by borrowed slices, typically `'static` data in flash.
#[derive(Copy, Clone, Debug)]
pub struct StaticModuleTable<'a> {
    modules: &'a [ModuleEntry<'a>],
}

impl<'a> StaticModuleTable<'a> {
    #[must_use]
    pub const fn new(modules: &'a [ModuleEntry<'a>]) -> Self {
        Self { modules }
    }
}

impl ModuleTable for StaticModuleTable<'_> {
    fn module_count(&self) -> usize {
        self.modules.len()
    }

    fn access_id(&self, index: usize) -> Option<u8> {
        self.modules.get(index).map(|m| m.access_id)
    }

    fn function_table(&self, index: usize) -> Option<&[FunctionEntry]> {
        self.modules.get(index).map(|m| m.functions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LED_FUNCS: [FunctionEntry; 2] = [
        FunctionEntry {
            command: 0x01,
            function: 10,
        },
        FunctionEntry {
            command: 0x02,
            function: 11,
        },
    ];

    const TONE_FUNCS: [FunctionEntry; 1] = [FunctionEntry {
        command: 0x01,
        function: 20,
    }];

    static MODULES: [ModuleEntry<'static>; 2] = [
        ModuleEntry {
            access_id: 0xA0,
            functions: &LED_FUNCS,
        },
        ModuleEntry {
            access_id: 0xB0,
            functions: &TONE_FUNCS,
        },
    ];

    #[test]
    fn test_indexed_lookup() {
        let table = StaticModuleTable::new(&MODULES);
        assert_eq!(table.module_count(), 2);
        assert_eq!(table.access_id(1), Some(0xB0));
        assert_eq!(table.access_id(2), None);
        assert_eq!(table.access_command(0, 1), Some(0x02));
        assert_eq!(table.access_function(0, 1), Some(11));
        assert_eq!(table.access_function(1, 1), None);
    }

    #[test]
    fn test_resolve_by_access_id() {
        let table = StaticModuleTable::new(&MODULES);
        assert_eq!(table.find_module(0xB0), Some(1));
        assert_eq!(table.resolve(0xA0, 0x02), Some(11));
        assert_eq!(table.resolve(0xB0, 0x01), Some(20));
        assert_eq!(table.resolve(0xB0, 0x02), None);
        assert_eq!(table.resolve(0xC0, 0x01), None);
    }
}
