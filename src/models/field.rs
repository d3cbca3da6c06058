// Resolved values tagged with the strategy that produced them.

use serde::{Serialize, Serializer};

/// A value plus the id of the strategy that produced it. Serializes as the bare value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<T> {
    pub value: T,
    pub source: &'static str,
}

impl<T> Field<T> {
    pub fn new(value: T, source: &'static str) -> Self {
        Self { value, source }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        Field {
            value: f(self.value),
            source: self.source,
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

/// Serializes an absent list as `[]` instead of `null`.
pub fn list_or_empty<S, T>(field: &Option<Field<Vec<T>>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match field {
        Some(field) => field.value.serialize(serializer),
        None => Vec::<T>::new().serialize(serializer),
    }
}

/// Result of resolving one provider chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Found(Field<T>),
    /// Every allowed strategy ran and none produced a value, or the chain had none to run.
    Exhausted,
    /// Fast-mode policy removed every strategy before dispatch.
    Skipped,
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Outcome::Skipped
    }
}

impl<T> Outcome<T> {
    pub fn found(self) -> Option<Field<T>> {
        match self {
            Outcome::Found(field) => Some(field),
            Outcome::Exhausted | Outcome::Skipped => None,
        }
    }

    /// Applies a hard default only when the chain actually ran.
    pub fn or_default(self, value: T, source: &'static str) -> Option<Field<T>> {
        match self {
            Outcome::Found(field) => Some(field),
            Outcome::Exhausted => Some(Field::new(value, source)),
            Outcome::Skipped => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_applies_only_when_exhausted() {
        assert_eq!(
            Outcome::<u32>::Exhausted.or_default(1, "default"),
            Some(Field::new(1, "default"))
        );
        assert_eq!(Outcome::<u32>::Skipped.or_default(1, "default"), None);
        assert_eq!(
            Outcome::Found(Field::new(2, "lscpu")).or_default(1, "default"),
            Some(Field::new(2, "lscpu"))
        );
    }

    #[test]
    fn field_serializes_as_bare_value() {
        let json = serde_json::to_string(&Field::new("eth0", "ip")).expect("serialize");
        assert_eq!(json, "\"eth0\"");
    }
}
