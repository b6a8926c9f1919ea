use redb::TableDefinition;

/// Table backing the key-value persistence boundary.
/// Key: UTF-8 key such as "likes"
/// Value: UTF-8 document as bytes
pub const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");
