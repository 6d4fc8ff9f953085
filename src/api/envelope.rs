//! Backend response envelope
//!
//! Every panel endpoint answers `{code, msg, data}`; code 0 is success.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

pub const SUCCESS_CODE: i32 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn err(code: i32, msg: &str) -> Self {
        Self { code, msg: Some(msg.to_string()), data: None }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Non-success codes become `DomainError::Rejected`
    pub fn into_result(self) -> DomainResult<Option<T>> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(DomainError::Rejected {
                code: self.code,
                msg: self.msg.unwrap_or_else(|| "request failed".to_string()),
            })
        }
    }
}

impl ApiResponse<()> {
    /// Success without payload
    pub fn done(msg: &str) -> Self {
        Self { code: SUCCESS_CODE, msg: Some(msg.to_string()), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_without_data() {
        let res: ApiResponse<()> = serde_json::from_str(r#"{"code":0,"msg":"ok"}"#).unwrap();
        assert!(res.is_success());
        assert_eq!(res.into_result(), Ok(None));
    }

    #[test]
    fn test_failure_code_is_rejected() {
        let res: ApiResponse<Vec<u32>> = serde_json::from_str(r#"{"code":-1,"msg":"forbidden"}"#).unwrap();
        assert_eq!(
            res.into_result(),
            Err(DomainError::Rejected { code: -1, msg: "forbidden".to_string() })
        );

        let res: ApiResponse<()> = serde_json::from_str(r#"{"code":500}"#).unwrap();
        assert_eq!(
            res.into_result(),
            Err(DomainError::Rejected { code: 500, msg: "request failed".to_string() })
        );
    }
}
