//! # Preference Set Validation
//!
//! Engine-wide preferences arrive as a flat record validated against a
//! fixed, closed key set. On success a typed [`Preferences`] is produced;
//! every field is optional and engine defaults are applied by accessor
//! (`convert` defaults to enabled).
//!
//! The `stripUnknown` key carries a compound constraint: a record must
//! name at least one of its two sub-flags, while a plain boolean is
//! accepted as shorthand for "all sub-flags".

use serde::{Deserialize, Serialize};

use verdict_core::{ConfigValue, FieldPath};

use crate::fields::{ensure_known_keys, expect_bool, expect_one_of, expect_record, expect_str};
use crate::violation::{ShapeViolation, ViolationKind};

/// Date rendering mode for converted date values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    Date,
    Iso,
    String,
    Time,
    Utc,
}

/// Default presence requirement applied to every slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Required,
    Optional,
    Forbidden,
}

/// Error-rendering preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorPrefs {
    /// Escape HTML in rendered messages.
    pub escape_html: Option<bool>,
    /// Message language selector.
    pub language: Option<String>,
    /// Wrap sequence labels in brackets.
    pub wrap_arrays: Option<bool>,
}

/// Unknown-key stripping policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StripUnknown {
    /// Boolean shorthand: strip (or keep) everywhere.
    All(bool),
    /// Per-container policy; at least one sub-flag is always present.
    Scoped {
        arrays: Option<bool>,
        objects: Option<bool>,
    },
}

/// Validated engine-wide preferences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    pub allow_unknown: Option<bool>,
    pub abort_early: Option<bool>,
    pub cache: Option<bool>,
    /// External validation context, passed through unvalidated.
    pub context: Option<ConfigValue>,
    pub convert: Option<bool>,
    pub date_format: Option<DateFormat>,
    pub errors: Option<ErrorPrefs>,
    pub externals: Option<bool>,
    /// Message template overrides, passed through unvalidated.
    pub messages: Option<ConfigValue>,
    pub no_defaults: Option<bool>,
    pub non_enumerables: Option<bool>,
    pub presence: Option<Presence>,
    pub skip_functions: Option<bool>,
    pub strip_unknown: Option<StripUnknown>,
    pub warnings: Option<bool>,
}

impl Preferences {
    /// Whether raw inputs may be converted to canonical values.
    /// Enabled unless explicitly disabled.
    pub fn convert(&self) -> bool {
        self.convert.unwrap_or(true)
    }

    /// Whether validation stops at the first failure. Defaults to true.
    pub fn abort_early(&self) -> bool {
        self.abort_early.unwrap_or(true)
    }

    /// Whether unknown keys are tolerated. Defaults to false.
    pub fn allow_unknown(&self) -> bool {
        self.allow_unknown.unwrap_or(false)
    }

    /// Validate a raw preference record and extract the typed set.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint: a key outside the closed
    /// set, a wrongly-typed value, or a `stripUnknown` record naming
    /// neither sub-flag.
    pub fn from_config(raw: &ConfigValue) -> Result<Self, ShapeViolation> {
        let root = FieldPath::root();
        let pairs = expect_record(raw, &root)?;

        let mut prefs = Preferences::default();
        for (key, value) in pairs {
            let path = root.key(key);
            match key.as_str() {
                "allowUnknown" => prefs.allow_unknown = Some(expect_bool(value, &path)?),
                "abortEarly" => prefs.abort_early = Some(expect_bool(value, &path)?),
                "cache" => prefs.cache = Some(expect_bool(value, &path)?),
                "context" => {
                    expect_record(value, &path)?;
                    prefs.context = Some(value.clone());
                }
                "convert" => prefs.convert = Some(expect_bool(value, &path)?),
                "dateFormat" => {
                    prefs.date_format =
                        Some(match expect_one_of(
                            value,
                            &path,
                            &["date", "iso", "string", "time", "utc"],
                        )? {
                            "date" => DateFormat::Date,
                            "iso" => DateFormat::Iso,
                            "string" => DateFormat::String,
                            "time" => DateFormat::Time,
                            _ => DateFormat::Utc,
                        });
                }
                "errors" => prefs.errors = Some(validate_errors(value, &path)?),
                "externals" => prefs.externals = Some(expect_bool(value, &path)?),
                "messages" => {
                    expect_record(value, &path)?;
                    prefs.messages = Some(value.clone());
                }
                "noDefaults" => prefs.no_defaults = Some(expect_bool(value, &path)?),
                "nonEnumerables" => prefs.non_enumerables = Some(expect_bool(value, &path)?),
                "presence" => {
                    prefs.presence = Some(
                        match expect_one_of(value, &path, &["required", "optional", "forbidden"])? {
                            "required" => Presence::Required,
                            "optional" => Presence::Optional,
                            _ => Presence::Forbidden,
                        },
                    );
                }
                "skipFunctions" => prefs.skip_functions = Some(expect_bool(value, &path)?),
                "stripUnknown" => prefs.strip_unknown = Some(validate_strip_unknown(value, &path)?),
                "warnings" => prefs.warnings = Some(expect_bool(value, &path)?),
                other => return Err(ShapeViolation::unknown_field(&root, other)),
            }
        }

        Ok(prefs)
    }
}

fn validate_errors(value: &ConfigValue, path: &FieldPath) -> Result<ErrorPrefs, ShapeViolation> {
    let pairs = expect_record(value, path)?;
    ensure_known_keys(pairs, &["escapeHtml", "language", "wrapArrays"], path)?;

    let mut errors = ErrorPrefs::default();
    if let Some(flag) = value.get("escapeHtml") {
        errors.escape_html = Some(expect_bool(flag, &path.key("escapeHtml"))?);
    }
    if let Some(language) = value.get("language") {
        errors.language = Some(expect_str(language, &path.key("language"))?.to_string());
    }
    if let Some(flag) = value.get("wrapArrays") {
        errors.wrap_arrays = Some(expect_bool(flag, &path.key("wrapArrays"))?);
    }
    Ok(errors)
}

fn validate_strip_unknown(
    value: &ConfigValue,
    path: &FieldPath,
) -> Result<StripUnknown, ShapeViolation> {
    // Boolean shorthand for "all sub-flags".
    if let Some(flag) = value.as_bool() {
        return Ok(StripUnknown::All(flag));
    }

    let pairs = expect_record(value, path)?;
    ensure_known_keys(pairs, &["arrays", "objects"], path)?;

    let arrays = match value.get("arrays") {
        None => None,
        Some(flag) => Some(expect_bool(flag, &path.key("arrays"))?),
    };
    let objects = match value.get("objects") {
        None => None,
        Some(flag) => Some(expect_bool(flag, &path.key("objects"))?),
    };

    if arrays.is_none() && objects.is_none() {
        return Err(ShapeViolation::new(
            path.clone(),
            ViolationKind::MissingAlternative,
            "must carry at least one of arrays, objects",
        ));
    }

    Ok(StripUnknown::Scoped { arrays, objects })
}
