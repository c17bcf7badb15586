use ticklist_core::{
  KeyValueStore,
  StorageError
};

/// `window.localStorage`, looked up on every call so a storage that
/// becomes unavailable mid-session degrades to errors instead of panics.
#[derive(
  Debug, Clone, Copy, Default,
)]
pub struct LocalStorage;

fn local_storage()
-> Result<web_sys::Storage, StorageError>
{
  web_sys::window()
    .ok_or_else(|| {
      StorageError::Unavailable(
        "no window".to_string()
      )
    })?
    .local_storage()
    .map_err(|error| {
      StorageError::Unavailable(
        format!("{error:?}")
      )
    })?
    .ok_or_else(|| {
      StorageError::Unavailable(
        "localStorage is disabled"
          .to_string()
      )
    })
}

impl KeyValueStore for LocalStorage {
  fn get(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>
  {
    local_storage()?
      .get_item(key)
      .map_err(|error| {
        StorageError::Unavailable(
          format!("{error:?}")
        )
      })
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    // quota errors surface here as a DOMException
    local_storage()?
      .set_item(key, value)
      .map_err(|error| {
        StorageError::Rejected(format!(
          "{error:?}"
        ))
      })
  }
}
