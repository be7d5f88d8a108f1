//! Applies a procedure's field assignments to a record.

use crate::backref;
use crate::context::MatchContext;
use crate::procedure::{Assignment, Field};
use crate::record::MetadataRecord;
use crate::report::Warning;
use crate::value::{Rejection, Value, ValueKind};
use std::collections::BTreeMap;

/// Detail keys copied from a parent record instead of being scraped.
#[derive(Clone, Copy)]
pub(crate) struct Inheritance<'a> {
    pub keys: &'a BTreeMap<String, String>,
    pub parent: &'a dyn MetadataRecord,
}

/// Policy for one batch of assignments.
#[derive(Clone, Copy)]
pub(crate) struct Setter<'a> {
    pub import: bool,
    pub inheritance: Option<Inheritance<'a>>,
}
impl Setter<'_> {
    /// Writes every assignment against `context`. Rejected values are
    /// reported and skipped; they never fail the procedure.
    pub fn apply(
        &self,
        assignments: &[Assignment],
        context: &MatchContext,
        record: &mut dyn MetadataRecord,
        warnings: &mut Vec<Warning>,
    ) {
        for assignment in assignments {
            if let Field::Detail(key) = &assignment.field
                && let Some(inheritance) = self.inheritance
                && let Some(parent_key) = inheritance.keys.get(key)
            {
                let value = inheritance.parent.detail(parent_key).cloned().unwrap_or_default();
                tracing::trace!(key, parent_key, "inheriting detail from parent");
                record.set_detail(key, value);
                continue;
            }
            let value = expand_value(&assignment.value, context, warnings);
            match (&assignment.field, value) {
                (field @ (Field::Icon | Field::Fanart), Value::Array(items)) => {
                    for item in items {
                        match item.as_str().map(str::to_string) {
                            Some(reference) => self.add_image(field, reference, record),
                            None => reject(field, Rejection {
                                expected: ValueKind::String,
                                found: item.kind(),
                                value: item,
                            }, warnings),
                        }
                    }
                },
                (field, value) => {
                    if let Err(rejection) = self.write(field, value, record) {
                        reject(field, rejection, warnings);
                    }
                },
            }
        }
    }

    fn write(&self, field: &Field, value: Value, record: &mut dyn MetadataRecord) -> Result<(), Rejection> {
        match field {
            Field::Name => record.set_name(value.into_text()?),
            Field::Description => record.set_description(value.into_text()?),
            Field::Icon | Field::Fanart => self.add_image(field, value.into_text()?, record),
            Field::Detail(key) => {
                let value = Value::coerce(record.detail(key), value)?;
                record.set_detail(key, value);
            },
        }
        Ok(())
    }

    fn add_image(&self, field: &Field, reference: String, record: &mut dyn MetadataRecord) {
        if matches!(field, Field::Fanart) {
            record.add_fanart(reference, self.import);
        } else {
            record.add_icon(reference, self.import);
        }
    }
}

fn reject(field: &Field, rejection: Rejection, warnings: &mut Vec<Warning>) {
    tracing::warn!(%field, %rejection, "rejected value");
    warnings.push(Warning::CoercionRejected {
        field: field.to_string(),
        expected: rejection.expected,
        found: rejection.found,
    });
}

/// Expands a template (string) value against `context`, recording any
/// malformed backreferences. Strings inside arrays are expanded too; other
/// values pass through untouched.
pub(crate) fn expand_value(value: &Value, context: &MatchContext, warnings: &mut Vec<Warning>) -> Value {
    match value {
        Value::String(template) => Value::String(expand(template, context, warnings)),
        Value::Array(items) => Value::Array(items.iter().map(|item| expand_value(item, context, warnings)).collect()),
        other => other.clone(),
    }
}

pub(crate) fn expand(template: &str, context: &MatchContext, warnings: &mut Vec<Warning>) -> String {
    let expansion = backref::expand(template, context);
    for offset in &expansion.malformed {
        tracing::warn!(template, offset, "malformed backreference left verbatim");
        warnings.push(Warning::MalformedBackreference {
            template: template.to_string(),
            offset: *offset,
        });
    }
    expansion.text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Details, Image, Record};

    fn context() -> MatchContext {
        MatchContext::new(vec![
            Some("Heat (1995)".to_string()),
            Some("Heat".to_string()),
            Some("1995".to_string()),
        ])
    }

    fn assignments(pairs: &[(&str, Value)]) -> Vec<Assignment> {
        pairs
            .iter()
            .map(|(key, value)| Assignment {
                field: Field::from(*key),
                value: value.clone(),
            })
            .collect()
    }

    const LINK: Setter<'static> = Setter {
        import: false,
        inheritance: None,
    };

    #[test]
    fn test_name_description_and_images() {
        let mut record = Record::new("heat.mkv");
        let mut warnings = Vec::new();
        let set = assignments(&[
            ("name", Value::from("$1")),
            ("description", Value::from("Released in $2")),
            ("icon", Value::from("$1.png")),
            ("fanart", Value::from("$1-fanart.jpg")),
        ]);
        Setter {
            import: true,
            inheritance: None,
        }
        .apply(&set, &context(), &mut record, &mut warnings);

        assert!(warnings.is_empty());
        assert_eq!(record.name.as_deref(), Some("Heat"));
        assert_eq!(record.description.as_deref(), Some("Released in 1995"));
        assert_eq!(record.icons, vec![Image { reference: "Heat.png".to_string(), import: true }]);
        assert_eq!(record.fanart, vec![Image { reference: "Heat-fanart.jpg".to_string(), import: true }]);
    }

    #[test]
    fn test_image_lists_expand_each_entry() {
        let mut record = Record::new("heat.mkv");
        let mut warnings = Vec::new();
        let set = assignments(&[
            ("icon", Value::Array(vec![Value::from("$1.png"), Value::from("back-$1.png")])),
            ("fanart", Value::Array(vec![Value::from(3), Value::from("$2.jpg")])),
        ]);
        LINK.apply(&set, &context(), &mut record, &mut warnings);

        let image = |reference: &str| Image {
            reference: reference.to_string(),
            import: false,
        };
        assert_eq!(record.icons, vec![image("Heat.png"), image("back-Heat.png")]);
        assert_eq!(record.fanart, vec![image("1995.jpg")]);
        assert_eq!(
            warnings,
            vec![Warning::CoercionRejected {
                field: "fanart".to_string(),
                expected: ValueKind::String,
                found: ValueKind::Number,
            }]
        );
    }

    #[test]
    fn test_array_detail_entries_are_expanded() {
        let mut record = Record::new("heat.mkv");
        let mut warnings = Vec::new();
        let set = assignments(&[("credits", Value::Array(vec![Value::from("$1"), Value::from(true)]))]);
        LINK.apply(&set, &context(), &mut record, &mut warnings);
        assert_eq!(record.details["credits"], Value::Array(vec![Value::from("Heat"), Value::from(true)]));
    }

    #[test]
    fn test_detail_coerced_to_existing_type() {
        let mut record = Record::new("heat.mkv").with_details(Details::from([
            ("year".to_string(), Value::from(0)),
            ("title".to_string(), Value::from("")),
            ("genres".to_string(), Value::Array(vec![])),
        ]));
        let mut warnings = Vec::new();
        let set = assignments(&[
            ("year", Value::from("$2")),
            ("title", Value::from(true)),
            ("genres", Value::from("Crime")),
            ("fresh", Value::from(7)),
        ]);
        LINK.apply(&set, &context(), &mut record, &mut warnings);

        assert!(warnings.is_empty());
        assert_eq!(record.details["year"], Value::from(1995));
        assert_eq!(record.details["title"], Value::from("Yes"));
        assert_eq!(record.details["genres"], Value::Array(vec![Value::from("Crime")]));
        assert_eq!(record.details["fresh"], Value::from(7));
    }

    #[test]
    fn test_rejection_leaves_field_and_continues() {
        let mut record = Record::new("heat.mkv").with_details(Details::from([
            ("watched".to_string(), Value::from(false)),
            ("year".to_string(), Value::from(0)),
        ]));
        let mut warnings = Vec::new();
        let set = assignments(&[("watched", Value::from("maybe")), ("year", Value::from("$2"))]);
        LINK.apply(&set, &context(), &mut record, &mut warnings);

        assert_eq!(record.details["watched"], Value::from(false));
        assert_eq!(record.details["year"], Value::from(1995));
        assert_eq!(
            warnings,
            vec![Warning::CoercionRejected {
                field: "watched".to_string(),
                expected: ValueKind::Boolean,
                found: ValueKind::String,
            }]
        );
    }

    #[test]
    fn test_name_rejects_structured_values() {
        let mut record = Record::new("heat.mkv");
        let mut warnings = Vec::new();
        LINK.apply(&assignments(&[("name", Value::Array(vec![]))]), &context(), &mut record, &mut warnings);
        assert_eq!(record.name, None);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_malformed_reference_is_reported_and_kept() {
        let mut record = Record::new("heat.mkv");
        let mut warnings = Vec::new();
        LINK.apply(&assignments(&[("name", Value::from("Hello $x"))]), &context(), &mut record, &mut warnings);
        assert_eq!(record.name.as_deref(), Some("Hello $x"));
        assert_eq!(
            warnings,
            vec![Warning::MalformedBackreference {
                template: "Hello $x".to_string(),
                offset: 6,
            }]
        );
    }

    #[test]
    fn test_inherited_details_come_from_parent() {
        let parent = Record::new("collection").with_details(Details::from([("label".to_string(), Value::from("A24"))]));
        let keys = BTreeMap::from([
            ("studio".to_string(), "label".to_string()),
            ("country".to_string(), "missing".to_string()),
        ]);
        let setter = Setter {
            import: false,
            inheritance: Some(Inheritance {
                keys: &keys,
                parent: &parent,
            }),
        };
        let mut record = Record::new("heat.mkv");
        let mut warnings = Vec::new();
        let set = assignments(&[
            ("studio", Value::from("$1 Studios")),
            ("country", Value::from("US")),
            ("year", Value::from("$2")),
        ]);
        setter.apply(&set, &context(), &mut record, &mut warnings);

        assert_eq!(record.details["studio"], Value::from("A24"));
        assert_eq!(record.details["country"], Value::Null);
        assert_eq!(record.details["year"], Value::from("1995"));
    }
}
