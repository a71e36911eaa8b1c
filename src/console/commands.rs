//! The console's verb table.

use serde_json::Value;

use super::literal;
use crate::error::CommandError;
use crate::models::{store_key, Field, Kind};
use crate::storage::FileStorage;

/// Attributes that identify an entity or are maintained by the store.
const READ_ONLY: &[&str] = &["id", "created_at", "updated_at", "__class__"];

/// A console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Create,
    Show,
    Destroy,
    All,
    Count,
    Update,
    Help,
    Quit,
    /// End of input typed as a command.
    Eof,
}

impl Verb {
    pub const ALL: [Verb; 9] = [
        Self::Eof,
        Self::All,
        Self::Count,
        Self::Create,
        Self::Destroy,
        Self::Help,
        Self::Quit,
        Self::Show,
        Self::Update,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Show => "show",
            Self::Destroy => "destroy",
            Self::All => "all",
            Self::Count => "count",
            Self::Update => "update",
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Eof => "EOF",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::Create),
            "show" => Some(Self::Show),
            "destroy" => Some(Self::Destroy),
            "all" => Some(Self::All),
            "count" => Some(Self::Count),
            "update" => Some(Self::Update),
            "help" => Some(Self::Help),
            "quit" => Some(Self::Quit),
            "EOF" => Some(Self::Eof),
            _ => None,
        }
    }

    /// Whether the verb can be written call-style, as `<Class>.<verb>(<args>)`.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Self::All | Self::Show | Self::Destroy | Self::Count | Self::Update
        )
    }

    pub fn usage(&self) -> &'static str {
        match self {
            Self::Create => "Usage: create <class>\nCreate a new class instance and print its id.",
            Self::Show => {
                "Usage: show <class> <id> or <class>.show(<id>)\n\
                 Display the string representation of a class instance of a given id."
            }
            Self::Destroy => {
                "Usage: destroy <class> <id> or <class>.destroy(<id>)\n\
                 Delete a class instance of a given id."
            }
            Self::All => {
                "Usage: all or all <class> or <class>.all()\n\
                 Display string representations of all instances of a given class.\n\
                 If no class is specified, displays all instantiated objects."
            }
            Self::Count => {
                "Usage: count <class> or <class>.count()\n\
                 Retrieve the number of instances of a given class."
            }
            Self::Update => {
                "Usage: update <class> <id> <attribute_name> <attribute_value> or\n\
                 <class>.update(<id>, <attribute_name>, <attribute_value>) or\n\
                 <class>.update(<id>, <dictionary>)\n\
                 Update a class instance of a given id by adding or updating\n\
                 a given attribute key/value pair or dictionary."
            }
            Self::Help => "List available commands with \"help\" or detailed help with \"help <command>\".",
            Self::Quit => "Quit command to exit the program.",
            Self::Eof => "EOF signal to exit the program.",
        }
    }
}

/// What a successfully dispatched command asks the console to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Silent,
    Print(String),
    Quit,
    EndOfInput,
}

/// Run `verb` against `storage` with the parsed argument tokens.
///
/// Validation happens before any mutation, so an `Err` other than
/// `CommandError::Storage` leaves the store untouched.
pub fn dispatch(
    storage: &mut FileStorage,
    verb: Verb,
    tokens: &[String],
) -> Result<Reply, CommandError> {
    tracing::debug!(verb = verb.as_str(), ?tokens, "Dispatching command");
    match verb {
        Verb::Create => create(storage, tokens),
        Verb::Show => show(storage, tokens),
        Verb::Destroy => destroy(storage, tokens),
        Verb::All => all(storage, tokens),
        Verb::Count => count(storage, tokens),
        Verb::Update => update(storage, tokens),
        Verb::Help => Ok(Reply::Print(help(tokens))),
        Verb::Quit => Ok(Reply::Quit),
        Verb::Eof => Ok(Reply::EndOfInput),
    }
}

fn create(storage: &mut FileStorage, tokens: &[String]) -> Result<Reply, CommandError> {
    let kind = resolve_kind(tokens)?;
    let id = storage.create(kind).id.clone();
    storage.save()?;
    Ok(Reply::Print(id))
}

fn show(storage: &mut FileStorage, tokens: &[String]) -> Result<Reply, CommandError> {
    let (_, key) = locate(storage, tokens)?;
    let entity = storage.get(&key).ok_or(CommandError::NoInstanceFound)?;
    Ok(Reply::Print(entity.to_string()))
}

fn destroy(storage: &mut FileStorage, tokens: &[String]) -> Result<Reply, CommandError> {
    let (_, key) = locate(storage, tokens)?;
    storage.remove(&key);
    storage.save()?;
    Ok(Reply::Silent)
}

fn all(storage: &mut FileStorage, tokens: &[String]) -> Result<Reply, CommandError> {
    let filter = match tokens.first() {
        Some(name) => Some(Kind::from_str(name).ok_or(CommandError::ClassDoesntExist)?),
        None => None,
    };
    let rendered: Vec<String> = storage
        .all()
        .filter(|entity| filter.map_or(true, |kind| entity.kind == kind))
        .map(|entity| entity.to_string())
        .collect();
    Ok(Reply::Print(format!("[{}]", rendered.join(", "))))
}

// Unknown class names count as zero rather than being rejected.
fn count(storage: &mut FileStorage, tokens: &[String]) -> Result<Reply, CommandError> {
    let name = tokens.first().ok_or(CommandError::ClassNameMissing)?;
    let n = storage
        .all()
        .filter(|entity| entity.kind.as_str() == name.as_str())
        .count();
    Ok(Reply::Print(n.to_string()))
}

fn update(storage: &mut FileStorage, tokens: &[String]) -> Result<Reply, CommandError> {
    let (kind, key) = locate(storage, tokens)?;

    let changes: Vec<(String, Value)> = match tokens {
        [_, _] => return Err(CommandError::AttributeNameMissing),
        [_, _, mapping] => literal::parse_mapping(mapping)
            .ok_or(CommandError::ValueMissing)?
            .into_iter()
            .map(|(name, value)| -> Result<(String, Value), CommandError> {
                let value = coerce_value(kind, &name, value)?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>, CommandError>>()?,
        [_, _, name, value, ..] => vec![(name.clone(), coerce_text(kind, name, value)?)],
        _ => return Err(CommandError::InstanceIdMissing),
    };

    let entity = storage.get_mut(&key).ok_or(CommandError::NoInstanceFound)?;
    for (name, value) in changes {
        entity.set(name, value);
    }
    storage.save_entity(&key)?;
    Ok(Reply::Silent)
}

fn help(tokens: &[String]) -> String {
    match tokens.first() {
        Some(topic) => match Verb::from_str(topic) {
            Some(verb) => verb.usage().to_string(),
            None => format!("*** No help on {}", topic),
        },
        None => {
            let names: Vec<&str> = Verb::ALL.iter().map(Verb::as_str).collect();
            format!(
                "\nDocumented commands (type help <topic>):\n{}\n{}\n",
                "=".repeat(40),
                names.join("  ")
            )
        }
    }
}

fn resolve_kind(tokens: &[String]) -> Result<Kind, CommandError> {
    let name = tokens.first().ok_or(CommandError::ClassNameMissing)?;
    Kind::from_str(name).ok_or(CommandError::ClassDoesntExist)
}

/// Resolve the `<class> <id>` prefix to the key of a live entity.
fn locate(storage: &FileStorage, tokens: &[String]) -> Result<(Kind, String), CommandError> {
    let kind = resolve_kind(tokens)?;
    let id = tokens.get(1).ok_or(CommandError::InstanceIdMissing)?;
    let key = store_key(kind.as_str(), id);
    if !storage.contains(&key) {
        return Err(CommandError::NoInstanceFound);
    }
    Ok((kind, key))
}

fn guard_read_only(name: &str) -> Result<(), CommandError> {
    if READ_ONLY.contains(&name) {
        tracing::debug!(attribute = name, "Rejected update of read-only attribute");
        return Err(CommandError::ReadOnlyAttribute(name.to_string()));
    }
    Ok(())
}

/// Coerce a value typed on the command line to the attribute's declared type.
fn coerce_text(kind: Kind, name: &str, text: &str) -> Result<Value, CommandError> {
    guard_read_only(name)?;
    let raw = Value::String(text.to_string());
    match kind.field(name) {
        Some(field) if field.ty.is_scalar() => coerce_declared(field, &raw),
        Some(_) => Ok(literal::parse_list(text).map(Value::Array).unwrap_or(raw)),
        None => Ok(raw),
    }
}

/// Coerce a value from a mapping literal. Only scalar declared types coerce.
fn coerce_value(kind: Kind, name: &str, value: Value) -> Result<Value, CommandError> {
    guard_read_only(name)?;
    match kind.field(name) {
        Some(field) if field.ty.is_scalar() => coerce_declared(field, &value),
        _ => Ok(value),
    }
}

fn coerce_declared(field: &Field, value: &Value) -> Result<Value, CommandError> {
    field.ty.coerce(value).ok_or_else(|| {
        tracing::debug!(
            attribute = field.name,
            expected = field.ty.as_str(),
            %value,
            "Value does not fit declared type"
        );
        CommandError::InvalidValue(field.name.to_string())
    })
}
