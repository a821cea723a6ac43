//! Typed read access to an already parsed policy document.

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{
    error::{CompileResult, PolicyCompilationError},
    vocabulary::Vocabulary,
};

static EMPTY_OBJECT: Lazy<Map<String, Value>> = Lazy::new(Map::new);

/// A policy model that can be built from one JSON object
pub trait Loadable: Sized {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self>;
}

/// What to do with a token outside its vocabulary
#[derive(Debug, Clone, Copy)]
pub enum OnInvalid<T> {
    /// Abort compilation of the whole document
    Reject,
    /// Log a warning and continue with the given value
    Fallback(T),
}

/// One JSON object of the policy document plus its dotted location
#[derive(Debug, Clone)]
pub struct JsonArchive<'a> {
    object: &'a Map<String, Value>,
    scope: String,
}

impl<'a> JsonArchive<'a> {
    pub fn new(object: &'a Map<String, Value>, scope: impl Into<String>) -> Self {
        Self {
            object,
            scope: scope.into(),
        }
    }

    /// Wrap a document root, which must be an object
    pub fn from_value(value: &'a Value, scope: impl Into<String>) -> CompileResult<Self> {
        let scope = scope.into();
        match value {
            Value::Object(object) => Ok(Self::new(object, scope)),
            _ => Err(PolicyCompilationError::NotAnObject {
                field: if scope.is_empty() { "<root>".to_string() } else { scope },
            }),
        }
    }

    /// An archive with no keys; every read yields its default
    pub fn empty(scope: impl Into<String>) -> JsonArchive<'static> {
        JsonArchive::new(&EMPTY_OBJECT, scope)
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn contains(&self, key: &str) -> bool {
        self.object.contains_key(key)
    }

    fn field_path(&self, key: &str) -> String {
        if self.scope.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.scope)
        }
    }

    /// Absent key yields `default`; a present value of the wrong type is fatal
    pub fn read_optional<T: DeserializeOwned>(&self, key: &str, default: T) -> CompileResult<T> {
        match self.object.get(key) {
            None => Ok(default),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                PolicyCompilationError::MalformedField {
                    field: self.field_path(key),
                    message: e.to_string(),
                }
            }),
        }
    }

    /// Same contract as [`read_optional`](Self::read_optional); absence is
    /// tolerated and only noted in the debug log
    pub fn read_mandatory<T: DeserializeOwned>(&self, key: &str, default: T) -> CompileResult<T> {
        if !self.contains(key) {
            debug!(field = %self.field_path(key), "Mandatory key absent, using default");
        }
        self.read_optional(key, default)
    }

    /// Read a vocabulary token, applying `on_invalid` to unknown tokens
    pub fn read_token<T: Vocabulary>(
        &self,
        key: &str,
        default: T,
        on_invalid: OnInvalid<T>,
    ) -> CompileResult<T> {
        let Some(token) = self.read_optional::<Option<String>>(key, None)? else {
            return Ok(default);
        };

        if let Some(value) = T::parse(&token) {
            return Ok(value);
        }

        let field = self.field_path(key);
        match on_invalid {
            OnInvalid::Reject => {
                warn!(field = %field, value = %token, "Invalid policy value");
                Err(PolicyCompilationError::invalid_value(field, token, T::TOKENS))
            }
            OnInvalid::Fallback(fallback) => {
                warn!(
                    field = %field,
                    value = %token,
                    fallback = fallback.as_str(),
                    "Invalid policy value, using fallback"
                );
                Ok(fallback)
            }
        }
    }

    pub fn read_mandatory_token<T: Vocabulary>(
        &self,
        key: &str,
        default: T,
        on_invalid: OnInvalid<T>,
    ) -> CompileResult<T> {
        if !self.contains(key) {
            debug!(
                field = %self.field_path(key),
                default = default.as_str(),
                "Mandatory key absent, using default"
            );
        }
        self.read_token(key, default, on_invalid)
    }

    /// Load a nested model; `None` when the key is absent
    pub fn read_object<T: Loadable>(&self, key: &str) -> CompileResult<Option<T>> {
        match self.object.get(key) {
            None => Ok(None),
            Some(Value::Object(object)) => {
                T::load(&JsonArchive::new(object, self.field_path(key))).map(Some)
            }
            Some(_) => Err(PolicyCompilationError::NotAnObject {
                field: self.field_path(key),
            }),
        }
    }

    /// Load a nested model, building it from defaults when the key is absent
    pub fn read_object_or_default<T: Loadable>(&self, key: &str) -> CompileResult<T> {
        match self.read_object(key)? {
            Some(model) => Ok(model),
            None => T::load(&JsonArchive::empty(self.field_path(key))),
        }
    }

    /// Load a list of nested models; an absent key is an empty list
    pub fn read_list<T: Loadable>(&self, key: &str) -> CompileResult<Vec<T>> {
        let items = match self.object.get(key) {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(PolicyCompilationError::MalformedField {
                    field: self.field_path(key),
                    message: "expected an array".to_string(),
                });
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let scope = format!("{}[{i}]", self.field_path(key));
                match item {
                    Value::Object(object) => T::load(&JsonArchive::new(object, scope)),
                    _ => Err(PolicyCompilationError::NotAnObject { field: scope }),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::policy::vocabulary::{Mode, SizeUnit};

    #[derive(Debug)]
    struct Limits {
        size: u64,
        unit: SizeUnit,
    }

    impl Loadable for Limits {
        fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
            Ok(Self {
                size: archive.read_optional("size", 10)?,
                unit: archive.read_token("unit", SizeUnit::Megabytes, OnInvalid::Reject)?,
            })
        }
    }

    #[test]
    fn absent_keys_yield_defaults() {
        let doc = json!({});
        let archive = JsonArchive::from_value(&doc, "").unwrap();
        assert_eq!(archive.read_optional("count", 7).unwrap(), 7);
        assert_eq!(archive.read_mandatory("name", "x".to_string()).unwrap(), "x");
        assert_eq!(
            archive
                .read_mandatory_token("overrideMode", Mode::Inactive, OnInvalid::Reject)
                .unwrap(),
            Mode::Inactive
        );
    }

    #[test]
    fn wrong_type_is_fatal() {
        let doc = json!({"webAttacks": {"maxObjectDepth": "deep"}});
        let root = JsonArchive::from_value(&doc, "").unwrap();
        let value = root.object.get("webAttacks").unwrap();
        let nested = JsonArchive::from_value(value, "webAttacks").unwrap();
        let err = nested.read_optional("maxObjectDepth", 40).unwrap_err();
        assert_eq!(err.field(), "webAttacks.maxObjectDepth");
        assert!(matches!(err, PolicyCompilationError::MalformedField { .. }));
    }

    #[test]
    fn invalid_token_rejects_or_falls_back() {
        let doc = json!({"mode": "block"});
        let archive = JsonArchive::from_value(&doc, "spec").unwrap();

        let err = archive
            .read_token("mode", Mode::Inactive, OnInvalid::Reject)
            .unwrap_err();
        assert_eq!(
            err,
            PolicyCompilationError::invalid_value("spec.mode", "block", Mode::TOKENS)
        );

        let mode = archive
            .read_token("mode", Mode::Prevent, OnInvalid::Fallback(Mode::Inactive))
            .unwrap();
        assert_eq!(mode, Mode::Inactive);
    }

    #[test]
    fn nested_objects_and_lists() {
        let doc = json!({
            "limits": {"size": 3, "unit": "KB"},
            "many": [{"size": 1}, {"unit": "GB"}],
            "broken": 5
        });
        let archive = JsonArchive::from_value(&doc, "").unwrap();

        let limits: Limits = archive.read_object("limits").unwrap().unwrap();
        assert_eq!(limits.size, 3);
        assert_eq!(limits.unit, SizeUnit::Kilobytes);

        let missing: Option<Limits> = archive.read_object("absent").unwrap();
        assert!(missing.is_none());

        let defaulted: Limits = archive.read_object_or_default("absent").unwrap();
        assert_eq!(defaulted.size, 10);
        assert_eq!(defaulted.unit, SizeUnit::Megabytes);

        let many: Vec<Limits> = archive.read_list("many").unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].unit, SizeUnit::Gigabytes);

        let err = archive.read_object::<Limits>("broken").unwrap_err();
        assert_eq!(err, PolicyCompilationError::NotAnObject { field: "broken".into() });
    }

    #[test]
    fn list_items_carry_indexed_paths() {
        let doc = json!({"many": [{"unit": "KB"}, {"unit": "TB"}]});
        let archive = JsonArchive::from_value(&doc, "root").unwrap();
        let err = archive.read_list::<Limits>("many").unwrap_err();
        assert_eq!(err.field(), "root.many[1].unit");
    }

    #[test]
    fn root_must_be_an_object() {
        let doc = json!([1, 2]);
        let err = JsonArchive::from_value(&doc, "").unwrap_err();
        assert_eq!(err.field(), "<root>");
    }
}
