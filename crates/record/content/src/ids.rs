//! Identifier newtypes shared by the record payloads.

record_core::define_id! {
    /// Login account primary key.
    pub struct AccountId => "account";
    /// Player character primary key.
    pub struct CharacterId => "character";
    pub struct ItemId => "item";
}
