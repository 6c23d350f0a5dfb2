use crate::replica::{BoardPath, WireError, WriteOp};
use std::collections::HashMap;

/// ClientForm reads the form a browser posts to a vessel's board.
///
/// * `POST /board` with `entry=<v>` creates a record.
/// * `POST /entries/<k>` with `delete=0&entry=<v>` modifies record `k`.
/// * `POST /entries/<k>` with `delete=1` deletes record `k`.
pub struct ClientForm;

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum ClientFormError {
    #[error("Form is missing field '{0}'")]
    MissingField(&'static str),
    #[error("Field 'delete' must be 0 or 1, got '{0}'")]
    InvalidDeleteFlag(String),
    #[error(transparent)]
    Path(#[from] WireError),
}

impl ClientForm {
    pub fn parse(path: &str, fields: &HashMap<String, String>) -> Result<WriteOp, ClientFormError> {
        match path.parse::<BoardPath>()? {
            BoardPath::Board => Ok(WriteOp::Create {
                value: required(fields, "entry")?,
            }),
            BoardPath::Entry(key) => match required(fields, "delete")?.as_str() {
                "0" => Ok(WriteOp::Modify {
                    key,
                    value: required(fields, "entry")?,
                }),
                "1" => Ok(WriteOp::Delete { key }),
                other => Err(ClientFormError::InvalidDeleteFlag(other.to_string())),
            },
        }
    }
}

fn required(fields: &HashMap<String, String>, name: &'static str) -> Result<String, ClientFormError> {
    fields.get(name).cloned().ok_or(ClientFormError::MissingField(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> HashMap<String, String> {
        fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn post_to_board_creates() {
        let op = ClientForm::parse("/board", &form(&[("entry", "hello")]));

        assert_eq!(op, Ok(WriteOp::Create { value: "hello".into() }));
    }

    #[test]
    fn post_to_entry_modifies_or_deletes() {
        assert_eq!(
            ClientForm::parse("/entries/3", &form(&[("delete", "0"), ("entry", "new")])),
            Ok(WriteOp::Modify {
                key: 3,
                value: "new".into()
            })
        );
        assert_eq!(
            ClientForm::parse("/entries/3", &form(&[("delete", "1"), ("entry", "ignored")])),
            Ok(WriteOp::Delete { key: 3 })
        );
    }

    #[test]
    fn bad_forms_are_rejected() {
        assert_eq!(
            ClientForm::parse("/board", &form(&[])),
            Err(ClientFormError::MissingField("entry"))
        );
        assert_eq!(
            ClientForm::parse("/entries/3", &form(&[("delete", "yes")])),
            Err(ClientFormError::InvalidDeleteFlag("yes".into()))
        );
        assert_eq!(
            ClientForm::parse("/entries/3", &form(&[("delete", "0")])),
            Err(ClientFormError::MissingField("entry"))
        );
        assert!(matches!(
            ClientForm::parse("/entries/x", &form(&[("delete", "1")])),
            Err(ClientFormError::Path(_))
        ));
    }
}
