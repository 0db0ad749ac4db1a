//! Document validation tests

mod common;

use common::{document, fixture_store, resource_document};
use csdl_schema_sdk::validation::SkipReason;
use csdl_schema_sdk::{
    DocumentValidator, ResolveError, SchemaStore, TypeResolver, Validated, ValidationError,
    ValidatorConfig,
};
use serde_json::{Value, json};

fn validate(store: &SchemaStore, config: &ValidatorConfig, doc: &Value) -> Result<Validated, ValidationError> {
    DocumentValidator::new(TypeResolver::new(store, config)).validate(doc, "test.json")
}

fn widget(extra: Value) -> Value {
    let mut doc = json!({
        "@odata.type": "#Widget.v1_1_0.Widget",
        "@odata.id": "/redfish/v1/Widgets/1",
        "Id": "1",
        "Name": "Widget One"
    });
    if let (Some(target), Some(source)) = (doc.as_object_mut(), extra.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
    doc
}

mod root_tests {
    use super::*;

    #[test]
    fn test_minimal_document_passes() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let result = validate(&store, &config, &widget(json!({}))).unwrap();
        assert_eq!(
            result,
            Validated::Checked {
                type_name: "Widget.v1_1_0.Widget".to_string()
            }
        );
    }

    #[test]
    fn test_json_schema_document_is_skipped() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = json!({"$schema": "http://json-schema.org/draft-07/schema#", "title": "Widget"});
        assert_eq!(
            validate(&store, &config, &doc).unwrap(),
            Validated::Skipped(SkipReason::JsonSchema)
        );
    }

    #[test]
    fn test_untyped_document_is_skipped() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = json!({"@odata.id": "/redfish/v1/", "v1": "/redfish/v1/"});
        assert_eq!(
            validate(&store, &config, &doc).unwrap(),
            Validated::Skipped(SkipReason::Untyped)
        );
    }

    #[test]
    fn test_type_hint_used_for_untyped_document() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let validator = DocumentValidator::new(TypeResolver::new(&store, &config));
        let doc = json!({"Speed": 3});
        let result = validator
            .validate_with_hint(&doc, Some("Widget.v1_0_0.Settings"), "settings.json")
            .unwrap();
        assert!(matches!(result, Validated::Checked { .. }));
    }

    #[test]
    fn test_non_string_document_type_is_rejected() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = json!({"@odata.type": 5, "Bogus": {"x": 1}});
        match validate(&store, &config, &doc) {
            Err(ValidationError::TypeMismatch { path, expected, found }) => {
                assert_eq!(path, "$.@odata.type");
                assert_eq!(expected, "a string");
                assert_eq!(found, "number");
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_non_string_type_ignores_hint() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let validator = DocumentValidator::new(TypeResolver::new(&store, &config));
        let doc = json!({"@odata.type": null, "Speed": 3});
        let result = validator.validate_with_hint(&doc, Some("Widget.v1_0_0.Settings"), "settings.json");
        assert!(matches!(result, Err(ValidationError::TypeMismatch { .. })));
    }

    #[test]
    fn test_unknown_document_type() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = json!({"@odata.type": "#Gizmo.v1_0_0.Gizmo"});
        match validate(&store, &config, &doc) {
            Err(ValidationError::UnknownType { path, type_name }) => {
                assert_eq!(path, "$");
                assert_eq!(type_name, "Gizmo.v1_0_0.Gizmo");
            }
            other => panic!("expected UnknownType, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_document() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let result = validate(&store, &config, &json!([1, 2, 3]));
        assert!(matches!(result, Err(ValidationError::TypeMismatch { .. })));
    }

    #[test]
    fn test_enum_document_type_is_not_structured() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = json!({"@odata.type": "#Widget.v1_0_0.Mode"});
        let result = validate(&store, &config, &doc);
        assert!(matches!(
            result,
            Err(ValidationError::Resolve {
                source: ResolveError::NotStructured { .. },
                ..
            })
        ));
    }
}

mod property_tests {
    use super::*;

    fn foo_store() -> SchemaStore {
        let foo = document(json!({
            "label": "NS_v1.json",
            "namespaces": [
                {
                    "name": "NS",
                    "definitions": {
                        "Foo": {"kind": "EntityType", "name": "Foo", "baseType": "Resource.v1_0_0.Resource", "abstract": true}
                    }
                },
                {
                    "name": "NS.v1_0_0",
                    "definitions": {
                        "Foo": {
                            "kind": "EntityType",
                            "name": "Foo",
                            "baseType": "NS.Foo",
                            "properties": common::properties(&[("Bar", "Edm.String")])
                        }
                    }
                }
            ]
        }));
        SchemaStore::builder()
            .add_root(foo)
            .add_root(document(resource_document()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_number_for_string_property() {
        let store = foo_store();
        let config = ValidatorConfig::default();
        let doc = json!({"@odata.type": "#NS.v1_0_0.Foo", "Bar": 5});
        match validate(&store, &config, &doc) {
            Err(ValidationError::TypeMismatch { path, found, .. }) => {
                assert_eq!(path, "$.Bar");
                assert_eq!(found, "number");
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_implicit_resource_properties_accepted() {
        let store = foo_store();
        let config = ValidatorConfig::default();
        let doc = json!({
            "@odata.type": "#NS.v1_0_0.Foo",
            "Id": "1",
            "Name": "Foo",
            "Description": "A foo",
            "Bar": "baz"
        });
        assert!(validate(&store, &config, &doc).is_ok());
    }

    #[test]
    fn test_unknown_property_on_closed_type() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        match validate(&store, &config, &widget(json!({"Flavor": "lime"}))) {
            Err(ValidationError::UnknownProperty { path, name, type_name }) => {
                assert_eq!(path, "$.Flavor");
                assert_eq!(name, "Flavor");
                assert_eq!(type_name, "Widget.v1_1_0.Widget");
            }
            other => panic!("expected UnknownProperty, got {:?}", other),
        }
    }

    #[test]
    fn test_inherited_and_own_properties() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = widget(json!({
            "Color": "red",
            "Count": 4,
            "Ratio": 0.5,
            "Enabled": true,
            "Weight": 1.25,
            "Uuid": "123e4567-E89B-12d3-a456-426614174000",
            "Updated": "2024-03-01T12:30:00Z",
            "Interval": "P1DT2H"
        }));
        assert!(validate(&store, &config, &doc).is_ok());
    }

    #[test]
    fn test_fractional_int64_rejected() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let result = validate(&store, &config, &widget(json!({"Count": 1.5})));
        assert!(matches!(result, Err(ValidationError::TypeMismatch { path, .. }) if path == "$.Count"));
    }

    #[test]
    fn test_primitive_formats() {
        let store = fixture_store();
        let config = ValidatorConfig::default();

        let bad_guid = validate(&store, &config, &widget(json!({"Uuid": "not-a-guid"})));
        assert!(matches!(bad_guid, Err(ValidationError::Format { .. })));

        let bad_date = validate(&store, &config, &widget(json!({"Updated": "yesterday"})));
        assert!(matches!(bad_date, Err(ValidationError::Format { .. })));

        let bad_duration = validate(&store, &config, &widget(json!({"Interval": "PT"})));
        assert!(matches!(bad_duration, Err(ValidationError::Format { .. })));
    }

    #[test]
    fn test_unsupported_primitive_with_value() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let result = validate(&store, &config, &widget(json!({"Legacy": 7})));
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedPrimitive { primitive, .. }) if primitive == "Edm.Int32"
        ));
    }

    #[test]
    fn test_unsupported_primitive_rejects_null() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let result = validate(&store, &config, &widget(json!({"Legacy": null})));
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedPrimitive { path, .. }) if path == "$.Legacy"
        ));
    }

    #[test]
    fn test_enum_member() {
        let store = fixture_store();
        let config = ValidatorConfig::default();

        assert!(validate(&store, &config, &widget(json!({"Mode": "Baz"}))).is_ok());

        match validate(&store, &config, &widget(json!({"Mode": "Foo"}))) {
            Err(ValidationError::EnumMember { path, value, enum_type }) => {
                assert_eq!(path, "$.Mode");
                assert_eq!(value, "Foo");
                assert_eq!(enum_type, "Widget.v1_0_0.Mode");
            }
            other => panic!("expected EnumMember, got {:?}", other),
        }
    }

    #[test]
    fn test_property_pattern() {
        let store = fixture_store();
        let config = ValidatorConfig::default();

        assert!(validate(&store, &config, &widget(json!({"Serial": "AB12"}))).is_ok());
        let result = validate(&store, &config, &widget(json!({"Serial": "ab-12"})));
        assert!(matches!(result, Err(ValidationError::Format { path, .. }) if path == "$.Serial"));
    }

    #[test]
    fn test_type_definition_pattern() {
        let store = fixture_store();
        let config = ValidatorConfig::default();

        assert!(validate(&store, &config, &widget(json!({"Label": "front"}))).is_ok());
        let result = validate(&store, &config, &widget(json!({"Label": "FRONT"})));
        assert!(matches!(result, Err(ValidationError::Format { .. })));
    }

    #[test]
    fn test_paging_and_vendor_annotations_on_keys() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = widget(json!({
            "Tags": ["a", "b"],
            "Tags@odata.count": 2,
            "Color@Redfish.Deprecated": "Use Hue",
            "@Redfish.Settings": {"SettingsObject": {}}
        }));
        assert!(validate(&store, &config, &doc).is_ok());
    }
}

mod nested_tests {
    use super::*;

    #[test]
    fn test_collection_requires_array() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let result = validate(&store, &config, &widget(json!({"Tags": "a"})));
        assert!(matches!(
            result,
            Err(ValidationError::TypeMismatch { path, expected, .. }) if path == "$.Tags" && expected == "an array"
        ));
    }

    #[test]
    fn test_collection_element_path() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let result = validate(&store, &config, &widget(json!({"Tags": ["a", 2]})));
        assert!(matches!(result, Err(ValidationError::TypeMismatch { path, .. }) if path == "$.Tags[1]"));
    }

    #[test]
    fn test_nested_complex_type() {
        let store = fixture_store();
        let config = ValidatorConfig::default();

        let ok = widget(json!({"Status": {"Health": "OK", "State": "Enabled"}}));
        assert!(validate(&store, &config, &ok).is_ok());

        let bad = widget(json!({"Status": {"Health": "Broken"}}));
        let result = validate(&store, &config, &bad);
        assert!(matches!(result, Err(ValidationError::EnumMember { path, .. }) if path == "$.Status.Health"));
    }

    #[test]
    fn test_complex_value_must_be_object() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let result = validate(&store, &config, &widget(json!({"Status": "OK"})));
        assert!(matches!(result, Err(ValidationError::TypeMismatch { .. })));
        assert!(validate(&store, &config, &widget(json!({"Status": null}))).is_ok());
    }

    #[test]
    fn test_shared_namespace_reference_uses_newest_shape() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = widget(json!({"Location": {"Info": "Rack 4", "PartLocation": "Slot 2"}}));
        assert!(validate(&store, &config, &doc).is_ok());
    }

    #[test]
    fn test_nested_type_follows_document_version() {
        let store = fixture_store();
        let config = ValidatorConfig::default();

        let newer = widget(json!({"Settings": {"Speed": 3, "Turbo": true}}));
        assert!(validate(&store, &config, &newer).is_ok());

        let older = json!({
            "@odata.type": "#Widget.v1_0_0.Widget",
            "Settings": {"Speed": 3, "Turbo": true}
        });
        let result = validate(&store, &config, &older);
        assert!(matches!(
            result,
            Err(ValidationError::UnknownProperty { path, .. }) if path == "$.Settings.Turbo"
        ));
    }

    #[test]
    fn test_non_string_nested_type_is_rejected() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = widget(json!({"Settings": {"@odata.type": ["#Widget.v1_1_0.Settings"], "Speed": 1}}));
        match validate(&store, &config, &doc) {
            Err(ValidationError::TypeMismatch { path, found, .. }) => {
                assert_eq!(path, "$.Settings.@odata.type");
                assert_eq!(found, "array");
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_nested_type_wins() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = json!({
            "@odata.type": "#Widget.v1_0_0.Widget",
            "Settings": {"@odata.type": "#Widget.v1_1_0.Settings", "Turbo": false}
        });
        assert!(validate(&store, &config, &doc).is_ok());
    }

    #[test]
    fn test_open_types_accept_anything() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = widget(json!({
            "Custom": {"Anything": 1, "Goes": [true]},
            "Oem": {"Contoso": {"Secret": 42}}
        }));
        assert!(validate(&store, &config, &doc).is_ok());
    }

    #[test]
    fn test_navigation_links() {
        let store = fixture_store();
        let config = ValidatorConfig::default();

        let linked = widget(json!({
            "Chassis": {"@odata.id": "/redfish/v1/Chassis/1"},
            "Peers": [{"@odata.id": "/redfish/v1/Widgets/2"}]
        }));
        assert!(validate(&store, &config, &linked).is_ok());

        let empty = widget(json!({"Chassis": {}}));
        assert!(validate(&store, &config, &empty).is_ok());

        let unlinked = widget(json!({"Chassis": {"Model": "X"}}));
        assert!(matches!(
            validate(&store, &config, &unlinked),
            Err(ValidationError::MissingIdentifier { path, .. }) if path == "$.Chassis"
        ));

        let empty_member = widget(json!({"Peers": [{}]}));
        assert!(matches!(
            validate(&store, &config, &empty_member),
            Err(ValidationError::MissingIdentifier { path, .. }) if path == "$.Peers[0]"
        ));
    }

    #[test]
    fn test_excerpt_copy_is_validated_inline() {
        let store = fixture_store();
        let config = ValidatorConfig::default();

        let excerpt = widget(json!({"ChassisSummary": {"Name": "Main chassis"}}));
        assert!(validate(&store, &config, &excerpt).is_ok());

        let bad = widget(json!({"ChassisSummary": {"Bogus": 1}}));
        assert!(matches!(
            validate(&store, &config, &bad),
            Err(ValidationError::UnknownProperty { path, .. }) if path == "$.ChassisSummary.Bogus"
        ));
    }

    #[test]
    fn test_depth_limit_on_recursive_type() {
        let tree = document(json!({
            "label": "Tree_v1.json",
            "namespaces": [{
                "name": "Tree.v1_0_0",
                "definitions": {
                    "Tree": {
                        "kind": "EntityType",
                        "name": "Tree",
                        "baseType": "Resource.v1_0_0.Resource",
                        "properties": common::properties(&[("Node", "Tree.v1_0_0.Node")])
                    },
                    "Node": {
                        "kind": "ComplexType",
                        "name": "Node",
                        "properties": common::properties(&[("Child", "Tree.v1_0_0.Node")])
                    }
                }
            }]
        }));
        let store = SchemaStore::builder()
            .add_root(tree)
            .add_root(document(resource_document()))
            .build()
            .unwrap();
        let config = ValidatorConfig::builder().max_depth(1).build();

        let shallow = json!({"@odata.type": "#Tree.v1_0_0.Tree", "Node": {}});
        assert!(validate(&store, &config, &shallow).is_ok());

        let deep = json!({"@odata.type": "#Tree.v1_0_0.Tree", "Node": {"Child": {"Child": null}}});
        match validate(&store, &config, &deep) {
            Err(ValidationError::CyclicType { path, max_depth }) => {
                assert_eq!(path, "$.Node.Child");
                assert_eq!(max_depth, 1);
            }
            other => panic!("expected CyclicType, got {:?}", other),
        }
    }
}

mod action_tests {
    use super::*;

    #[test]
    fn test_known_action() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = widget(json!({
            "Actions": {
                "#Widget.Reset": {"target": "/redfish/v1/Widgets/1/Actions/Widget.Reset"},
                "Oem": {}
            }
        }));
        assert!(validate(&store, &config, &doc).is_ok());
    }

    #[test]
    fn test_action_without_hash() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = widget(json!({"Actions": {"Widget.Reset": {}}}));
        assert!(matches!(
            validate(&store, &config, &doc),
            Err(ValidationError::InvalidAction { path, .. }) if path == "$.Actions.Widget.Reset"
        ));
    }

    #[test]
    fn test_unknown_action() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = widget(json!({"Actions": {"#Widget.Explode": {}}}));
        assert!(matches!(
            validate(&store, &config, &doc),
            Err(ValidationError::InvalidAction { .. })
        ));
    }

    #[test]
    fn test_non_action_definition() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = widget(json!({"Actions": {"#Widget.v1_0_0.Settings": {}}}));
        match validate(&store, &config, &doc) {
            Err(ValidationError::InvalidAction { reason, .. }) => {
                assert!(reason.contains("ComplexType"));
            }
            other => panic!("expected InvalidAction, got {:?}", other),
        }
    }

    #[test]
    fn test_capitalized_target_rejected() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = widget(json!({"Actions": {"#Widget.Reset": {"Target": "/x"}}}));
        match validate(&store, &config, &doc) {
            Err(ValidationError::InvalidAction { reason, .. }) => {
                assert!(reason.contains("Target"));
            }
            other => panic!("expected InvalidAction, got {:?}", other),
        }
    }
}

mod uri_tests {
    use super::*;

    #[test]
    fn test_uri_checked_when_enabled() {
        let store = fixture_store();
        let config = ValidatorConfig::builder().check_resource_uris(true).build();

        assert!(validate(&store, &config, &widget(json!({}))).is_ok());

        let nested = widget(json!({"@odata.id": "/redfish/v1/Systems/1/Widgets/2"}));
        assert!(validate(&store, &config, &nested).is_ok());

        let wrong = widget(json!({"@odata.id": "/redfish/v1/Widgets/1/Extra"}));
        match validate(&store, &config, &wrong) {
            Err(ValidationError::UriTemplateMismatch { path, near_misses, .. }) => {
                assert_eq!(path, "$.@odata.id");
                assert_eq!(near_misses.len(), 1);
                assert_eq!(near_misses[0].remainder, "/Extra");
            }
            other => panic!("expected UriTemplateMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_uri_ignored_by_default() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let doc = widget(json!({"@odata.id": "/somewhere/else"}));
        assert!(validate(&store, &config, &doc).is_ok());
    }
}

mod batch_tests {
    use super::*;

    #[test]
    fn test_validate_all_reports_each_document() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let validator = DocumentValidator::new(TypeResolver::new(&store, &config));

        let documents = vec![
            ("good.json".to_string(), widget(json!({}))),
            ("bad.json".to_string(), widget(json!({"Count": "many"}))),
            ("schema.json".to_string(), json!({"$schema": "x"})),
        ];
        let reports = validator.validate_all(&documents);

        assert_eq!(reports.len(), 3);
        assert!(reports[0].is_valid());
        assert!(!reports[1].is_valid());
        assert_eq!(reports[1].label, "bad.json");
        assert_eq!(
            reports[2].outcome,
            Ok(Validated::Skipped(SkipReason::JsonSchema))
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let store = fixture_store();
        let config = ValidatorConfig::default();
        let validator = DocumentValidator::new(TypeResolver::new(&store, &config));

        let documents: Vec<(String, Value)> = (0..16)
            .map(|i| {
                let doc = if i % 4 == 0 {
                    widget(json!({"Mode": "Nope"}))
                } else {
                    widget(json!({}))
                };
                (format!("doc{}.json", i), doc)
            })
            .collect();

        assert_eq!(
            validator.validate_all_parallel(&documents),
            validator.validate_all(&documents)
        );
    }
}
