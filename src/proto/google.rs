pub(crate) mod firestore {
    pub(crate) mod v1;
}
pub(crate) mod r#type;
