pub mod task;
pub mod user;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

pub use task::{Page, Pagination, Task, TaskFilter, TaskInput, TaskList, TaskQuery, TaskStatus};
pub use user::{LoginRequest, RegisterRequest, User, UserCredentials};

/// Reads a request body that must be a JSON object. Derived struct impls also
/// accept arrays and bind them by position, so request types go through this first.
fn json_object<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
    Map::<String, Value>::deserialize(deserializer).map(Value::Object)
}

/// Implements `Deserialize` for a request type whose derive uses
/// `#[serde(remote = "Self")]`, accepting JSON objects only.
macro_rules! object_only {
    ($ty:ty) => {
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let body = crate::models::json_object(deserializer)?;
                <$ty>::deserialize(body).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use object_only;
