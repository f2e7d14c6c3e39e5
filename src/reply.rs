//! JSON reply sent back to form posts: `{"codigo": 1, "texto": "..."}`.
//!
//! `codigo == 1` means success; anything else is shown to the user as an
//! error with `texto` as the message.
use crate::core::Result;
use serde::{Deserialize, Serialize};

pub const SUCCESS: i32 = 1;
pub const FAILURE: i32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub codigo: i32,
    pub texto: String,
}

impl Reply {
    pub fn success(texto: impl Into<String>) -> Self {
        Reply {
            codigo: SUCCESS,
            texto: texto.into(),
        }
    }

    pub fn failure(texto: impl Into<String>) -> Self {
        Reply {
            codigo: FAILURE,
            texto: texto.into(),
        }
    }

    /// Builds a reply from an operation outcome; errors become their message
    pub fn from_result<T, F>(result: &Result<T>, describe: F) -> Self
    where
        F: FnOnce(&T) -> String,
    {
        match result {
            Ok(value) => Reply::success(describe(value)),
            Err(e) => Reply::failure(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.codigo == SUCCESS
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
