use std::collections::HashSet;

use crate::models::{
    GroupMemberTable, GroupRestaurantTable, GroupTable, RestaurantTable, Table, VoteTable,
};

pub struct SchemaManager {
    tables: Vec<Box<dyn Table>>,
}

impl SchemaManager {
    pub fn new(mut tables: Vec<Box<dyn Table>>) -> Self {
        Self::sort_tables(&mut tables);
        Self { tables }
    }

    /// Orders tables so each one follows every table it references.
    fn sort_tables(tables: &mut Vec<Box<dyn Table>>) {
        let mut pending = std::mem::take(tables);
        let mut created: HashSet<&'static str> = HashSet::new();
        let mut sorted = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let (ready, blocked): (Vec<_>, Vec<_>) = pending.into_iter().partition(|table| {
                table
                    .dependencies()
                    .iter()
                    .all(|dependency| created.contains(dependency))
            });

            assert!(
                !ready.is_empty(),
                "Circular dependency detected or unresolved dependencies exist."
            );

            created.extend(ready.iter().map(|table| table.name()));
            sorted.extend(ready);
            pending = blocked;
        }

        *tables = sorted;
    }

    pub fn create_schema(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.create()).collect()
    }

    pub fn dispose_schema(&self) -> Vec<String> {
        self.tables.iter().rev().map(|table| table.dispose()).collect()
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        SchemaManager::new(vec![
            Box::new(GroupTable),
            Box::new(RestaurantTable),
            // Reference
            Box::new(GroupMemberTable),
            Box::new(GroupRestaurantTable),
            Box::new(VoteTable),
        ])
    }
}
