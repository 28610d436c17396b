//! A store that implements nothing.

use super::traits::{BoardStore, ItemStore, NoteStore, StatusStore, UserStore};
use super::OpContext;
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::{Item, ItemId, Note, NoteId, Status, StatusId, User};
use crate::{Error, Result};

/// Placeholder engine: every operation fails with
/// [`Error::NotImplemented`].
///
/// Useful as a base when wiring up a new backend piece by piece, and in
/// tests that must prove a code path never reaches storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedStore;

fn unimplemented<T>(operation: &str) -> Result<T> {
    Err(Error::NotImplemented(operation.to_string()))
}

impl ItemStore for UnimplementedStore {
    fn store_item(&self, _ctx: &OpContext, _item: Item) -> Result<Item> {
        unimplemented("store_item")
    }

    fn get_item(&self, _ctx: &OpContext, _id: &ItemId) -> Result<Item> {
        unimplemented("get_item")
    }

    fn find_items(&self, _ctx: &OpContext, _query: &QuerySpec) -> Result<Vec<Item>> {
        unimplemented("find_items")
    }

    fn update_item(&self, _ctx: &OpContext, _id: &ItemId, _update: &UpdateSpec) -> Result<()> {
        unimplemented("update_item")
    }

    fn delete_item(&self, _ctx: &OpContext, _id: &ItemId) -> Result<()> {
        unimplemented("delete_item")
    }
}

impl StatusStore for UnimplementedStore {
    fn store_status(&self, _ctx: &OpContext, _status: Status) -> Result<Status> {
        unimplemented("store_status")
    }

    fn get_status(&self, _ctx: &OpContext, _id: &StatusId) -> Result<Status> {
        unimplemented("get_status")
    }

    fn find_statuses(&self, _ctx: &OpContext, _query: &QuerySpec) -> Result<Vec<Status>> {
        unimplemented("find_statuses")
    }

    fn update_status(&self, _ctx: &OpContext, _id: &StatusId, _update: &UpdateSpec) -> Result<()> {
        unimplemented("update_status")
    }

    fn delete_status(&self, _ctx: &OpContext, _id: &StatusId) -> Result<()> {
        unimplemented("delete_status")
    }
}

impl NoteStore for UnimplementedStore {
    fn store_note(&self, _ctx: &OpContext, _note: Note, _item_id: &ItemId) -> Result<Note> {
        unimplemented("store_note")
    }

    fn get_note(&self, _ctx: &OpContext, _id: &NoteId) -> Result<Note> {
        unimplemented("get_note")
    }

    fn find_notes(&self, _ctx: &OpContext, _item_id: &ItemId, _query: &QuerySpec) -> Result<Vec<Note>> {
        unimplemented("find_notes")
    }

    fn update_note(&self, _ctx: &OpContext, _id: &NoteId, _update: &UpdateSpec) -> Result<()> {
        unimplemented("update_note")
    }

    fn delete_note(&self, _ctx: &OpContext, _id: &NoteId) -> Result<()> {
        unimplemented("delete_note")
    }
}

impl UserStore for UnimplementedStore {
    fn store_user(&self, _ctx: &OpContext, _user: User) -> Result<User> {
        unimplemented("store_user")
    }

    fn get_user(&self, _ctx: &OpContext, _username: &str) -> Result<User> {
        unimplemented("get_user")
    }

    fn find_users(&self, _ctx: &OpContext, _query: &QuerySpec) -> Result<Vec<User>> {
        unimplemented("find_users")
    }

    fn update_user(&self, _ctx: &OpContext, _username: &str, _update: &UpdateSpec) -> Result<()> {
        unimplemented("update_user")
    }

    fn delete_user(&self, _ctx: &OpContext, _username: &str) -> Result<()> {
        unimplemented("delete_user")
    }
}

impl BoardStore for UnimplementedStore {
    fn backend_name(&self) -> &'static str {
        "unimplemented"
    }
}
