use chrono::NaiveDateTime;
use diesel::prelude::*;
use crate::db::schema::kv_slots;

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = kv_slots)]
pub struct KvSlot {
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = kv_slots)]
pub struct NewKvSlot<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub updated_at: NaiveDateTime,
}
