use crate::replica::peers::VesselId;
use crate::replica::store::RecordOp;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// WriteOp is a write as a client asks for it. Creates don't have a key yet; the leader picks it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WriteOp {
    Create { value: String },
    Modify { key: u64, value: String },
    Delete { key: u64 },
}

impl WriteOp {
    /// The message a follower sends to have the leader perform this write.
    pub(crate) fn to_leader_message(&self) -> VesselMessage {
        match self.clone() {
            WriteOp::Create { value } => VesselMessage::SubmitEntryToLeader { value },
            WriteOp::Modify { key, value } => VesselMessage::ModifyEntryToLeader { key, value },
            WriteOp::Delete { key } => VesselMessage::DeleteEntryToLeader { key },
        }
    }
}

/// Every message vessels exchange. Leader-directed writes, leader-to-follower replication, and
/// the election/failure control messages.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VesselMessage {
    SubmitEntryToLeader { value: String },
    ModifyEntryToLeader { key: u64, value: String },
    DeleteEntryToLeader { key: u64 },
    /// Replicated create (`target` is the board) or modify (`target` is the entry).
    SubmitOnVessels { target: BoardPath, key: u64, value: String },
    DeleteOnVessels { key: u64 },
    LeaderElection { origin: VesselId, priority: u64 },
    DeadNeighbourInElection { dead: VesselId, max_id: VesselId },
    LeaderDeadNewElection { leader: VesselId, priority: u64, epoch: u64 },
}

impl VesselMessage {
    pub(crate) fn replicate(op: RecordOp) -> Self {
        match op {
            RecordOp::Create { key, value } => VesselMessage::SubmitOnVessels {
                target: BoardPath::Board,
                key,
                value,
            },
            RecordOp::Modify { key, value } => VesselMessage::SubmitOnVessels {
                target: BoardPath::Entry(key),
                key,
                value,
            },
            RecordOp::Delete { key } => VesselMessage::DeleteOnVessels { key },
        }
    }

    pub fn action(&self) -> Action {
        match self {
            VesselMessage::SubmitEntryToLeader { .. } => Action::SubmitEntryToLeader,
            VesselMessage::ModifyEntryToLeader { .. } => Action::ModifyEntryToLeader,
            VesselMessage::DeleteEntryToLeader { .. } => Action::DeleteEntryToLeader,
            VesselMessage::SubmitOnVessels { .. } => Action::SubmitOnVessels,
            VesselMessage::DeleteOnVessels { .. } => Action::DeleteOnVessels,
            VesselMessage::LeaderElection { .. } => Action::LeaderElection,
            VesselMessage::DeadNeighbourInElection { .. } => Action::DeadNeighbourInElection,
            VesselMessage::LeaderDeadNewElection { .. } => Action::LeaderDeadNewElection,
        }
    }
}

/// The `action` field values understood on the wire.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Action {
    SubmitEntryToLeader,
    SubmitOnVessels,
    ModifyEntryToLeader,
    DeleteEntryToLeader,
    DeleteOnVessels,
    LeaderElection,
    DeadNeighbourInElection,
    LeaderDeadNewElection,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::SubmitEntryToLeader => "submit_entry_to_leader",
            Action::SubmitOnVessels => "submit_on_vessels",
            Action::ModifyEntryToLeader => "modify_entry_to_leader",
            Action::DeleteEntryToLeader => "delete_entry_to_leader",
            Action::DeleteOnVessels => "delete_on_vessels",
            Action::LeaderElection => "leader_election",
            Action::DeadNeighbourInElection => "dead_neighbour_in_election",
            Action::LeaderDeadNewElection => "leader_dead_new_election",
        }
    }
}

impl FromStr for Action {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submit_entry_to_leader" => Ok(Action::SubmitEntryToLeader),
            "submit_on_vessels" => Ok(Action::SubmitOnVessels),
            "modify_entry_to_leader" => Ok(Action::ModifyEntryToLeader),
            "delete_entry_to_leader" => Ok(Action::DeleteEntryToLeader),
            "delete_on_vessels" => Ok(Action::DeleteOnVessels),
            "leader_election" => Ok(Action::LeaderElection),
            "dead_neighbour_in_election" => Ok(Action::DeadNeighbourInElection),
            "leader_dead_new_election" => Ok(Action::LeaderDeadNewElection),
            other => Err(WireError::UnknownAction(other.to_string())),
        }
    }
}

/// BoardPath is the request path a message is posted to. Submissions go to the board, writes to
/// an existing record go to that record's entry path.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BoardPath {
    Board,
    Entry(u64),
}

const BOARD_PATH: &str = "/board";
const ENTRY_PATH_PREFIX: &str = "/entries/";

impl FromStr for BoardPath {
    type Err = WireError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        if path == BOARD_PATH {
            return Ok(BoardPath::Board);
        }

        match path.strip_prefix(ENTRY_PATH_PREFIX) {
            Some(raw_key) => raw_key
                .parse::<u64>()
                .map(BoardPath::Entry)
                .map_err(|_| WireError::MalformedPath(path.to_string())),
            None => Err(WireError::MalformedPath(path.to_string())),
        }
    }
}

impl fmt::Display for BoardPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardPath::Board => write!(f, "{}", BOARD_PATH),
            BoardPath::Entry(key) => write!(f, "{}{}", ENTRY_PATH_PREFIX, key),
        }
    }
}

/// WireFields is the flat envelope every message travels in. Fields a message doesn't use are
/// empty strings.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WireFields {
    pub path: String,
    pub action: String,
    pub key: String,
    pub value: String,
    pub epoch: u64,
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum WireError {
    #[error("Unknown action '{0}'")]
    UnknownAction(String),
    #[error("Malformed path '{0}'")]
    MalformedPath(String),
    #[error("Field '{field}' is not a valid integer: '{raw}'")]
    MalformedInteger { field: &'static str, raw: String },
}

impl From<&VesselMessage> for WireFields {
    fn from(message: &VesselMessage) -> Self {
        let action = message.action().as_str().to_string();
        let (path, key, value, epoch) = match message {
            VesselMessage::SubmitEntryToLeader { value } => (BoardPath::Board, String::new(), value.clone(), 0),
            VesselMessage::ModifyEntryToLeader { key, value } => {
                (BoardPath::Entry(*key), key.to_string(), value.clone(), 0)
            }
            VesselMessage::DeleteEntryToLeader { key } => (BoardPath::Entry(*key), key.to_string(), String::new(), 0),
            VesselMessage::SubmitOnVessels { target, key, value } => (*target, key.to_string(), value.clone(), 0),
            VesselMessage::DeleteOnVessels { key } => (BoardPath::Entry(*key), key.to_string(), String::new(), 0),
            VesselMessage::LeaderElection { origin, priority } => {
                (BoardPath::Board, origin.to_string(), priority.to_string(), 0)
            }
            VesselMessage::DeadNeighbourInElection { dead, max_id } => {
                (BoardPath::Board, dead.to_string(), max_id.to_string(), 0)
            }
            VesselMessage::LeaderDeadNewElection {
                leader,
                priority,
                epoch,
            } => (BoardPath::Board, leader.to_string(), priority.to_string(), *epoch),
        };

        WireFields {
            path: path.to_string(),
            action,
            key,
            value,
            epoch,
        }
    }
}

impl TryFrom<WireFields> for VesselMessage {
    type Error = WireError;

    fn try_from(fields: WireFields) -> Result<Self, Self::Error> {
        let action = fields.action.parse::<Action>()?;
        let path = fields.path.parse::<BoardPath>()?;

        let message = match action {
            Action::SubmitEntryToLeader => VesselMessage::SubmitEntryToLeader { value: fields.value },
            Action::ModifyEntryToLeader => VesselMessage::ModifyEntryToLeader {
                key: parse_int("key", &fields.key)?,
                value: fields.value,
            },
            Action::DeleteEntryToLeader => VesselMessage::DeleteEntryToLeader {
                key: parse_int("key", &fields.key)?,
            },
            Action::SubmitOnVessels => VesselMessage::SubmitOnVessels {
                target: path,
                key: parse_int("key", &fields.key)?,
                value: fields.value,
            },
            Action::DeleteOnVessels => VesselMessage::DeleteOnVessels {
                key: parse_int("key", &fields.key)?,
            },
            Action::LeaderElection => VesselMessage::LeaderElection {
                origin: parse_int("key", &fields.key)?,
                priority: parse_int("value", &fields.value)?,
            },
            Action::DeadNeighbourInElection => VesselMessage::DeadNeighbourInElection {
                dead: parse_int("key", &fields.key)?,
                max_id: parse_int("value", &fields.value)?,
            },
            Action::LeaderDeadNewElection => VesselMessage::LeaderDeadNewElection {
                leader: parse_int("key", &fields.key)?,
                priority: parse_int("value", &fields.value)?,
                epoch: fields.epoch,
            },
        };

        Ok(message)
    }
}

fn parse_int<T: FromStr>(field: &'static str, raw: &str) -> Result<T, WireError> {
    raw.parse::<T>().map_err(|_| WireError::MalformedInteger {
        field,
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(fields: WireFields) -> Result<VesselMessage, WireError> {
        VesselMessage::try_from(fields)
    }

    #[test]
    fn replicated_modify_is_posted_to_entry_path() {
        let message = VesselMessage::replicate(RecordOp::Modify {
            key: 12,
            value: "new".into(),
        });
        let fields = WireFields::from(&message);

        assert_eq!(fields.path, "/entries/12");
        assert_eq!(fields.action, "submit_on_vessels");
        assert_eq!(fields.key, "12");
        assert_eq!(decode(fields), Ok(message));
    }

    #[test]
    fn replicated_create_and_modify_share_action_but_not_path() {
        let create = WireFields::from(&VesselMessage::replicate(RecordOp::Create {
            key: 0,
            value: "hello".into(),
        }));
        let modify = WireFields::from(&VesselMessage::replicate(RecordOp::Modify {
            key: 0,
            value: "hello".into(),
        }));

        assert_eq!(create.action, modify.action);
        assert_eq!(create.path, "/board");
        assert_ne!(create.path, modify.path);
    }

    #[test]
    fn election_fields_carry_id_and_priority() {
        let fields = WireFields::from(&VesselMessage::LeaderElection {
            origin: VesselId::new(3),
            priority: 4711,
        });

        assert_eq!(fields.action, "leader_election");
        assert_eq!(fields.key, "3");
        assert_eq!(fields.value, "4711");
    }

    #[test]
    fn announcement_keeps_epoch() {
        let message = VesselMessage::LeaderDeadNewElection {
            leader: VesselId::new(1),
            priority: 5,
            epoch: 2,
        };

        assert_eq!(decode(WireFields::from(&message)), Ok(message));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let fields = WireFields {
            path: "/board".into(),
            action: "make_me_leader".into(),
            ..WireFields::default()
        };

        assert_eq!(decode(fields), Err(WireError::UnknownAction("make_me_leader".into())));
    }

    #[test]
    fn malformed_key_is_rejected() {
        let fields = WireFields {
            path: "/entries/1".into(),
            action: "delete_on_vessels".into(),
            key: "None".into(),
            ..WireFields::default()
        };

        assert_eq!(
            decode(fields),
            Err(WireError::MalformedInteger {
                field: "key",
                raw: "None".into()
            })
        );
    }

    #[test]
    fn entry_path_key_is_parsed_verbatim() {
        assert_eq!("/entries/42".parse::<BoardPath>(), Ok(BoardPath::Entry(42)));
        assert_eq!("/board".parse::<BoardPath>(), Ok(BoardPath::Board));
        assert!("/entries/".parse::<BoardPath>().is_err());
        assert!("/entries/4x".parse::<BoardPath>().is_err());
        assert!("/other".parse::<BoardPath>().is_err());
    }

    #[test]
    fn follower_writes_become_leader_messages() {
        assert_eq!(
            WriteOp::Delete { key: 3 }.to_leader_message(),
            VesselMessage::DeleteEntryToLeader { key: 3 }
        );
        assert_eq!(
            WriteOp::Create { value: "v".into() }.to_leader_message(),
            VesselMessage::SubmitEntryToLeader { value: "v".into() }
        );
    }
}
