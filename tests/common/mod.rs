//! Shared schema fixtures for integration tests

#![allow(dead_code)]

use csdl_schema_sdk::{SchemaDocument, SchemaStore};
use serde_json::{Map, Value, json};

/// Structural properties as `name -> {name, type}`
pub fn properties(items: &[(&str, &str)]) -> Map<String, Value> {
    items
        .iter()
        .map(|(name, type_ref)| (name.to_string(), json!({"name": name, "type": type_ref})))
        .collect()
}

/// A navigation property
pub fn navigation(name: &str, type_ref: &str) -> Value {
    json!({"name": name, "type": type_ref, "kind": "Navigation"})
}

pub fn vocabulary_document() -> Value {
    json!({
        "label": "vocabularies",
        "namespaces": [
            {
                "name": "Org.OData.Core.V1",
                "definitions": {
                    "Description": {"kind": "Term", "name": "Description", "type": "Edm.String"},
                    "AdditionalProperties": {"kind": "Term", "name": "AdditionalProperties", "type": "Edm.Boolean"}
                }
            },
            {
                "name": "Org.OData.Validation.V1",
                "definitions": {
                    "Pattern": {"kind": "Term", "name": "Pattern", "type": "Edm.String"}
                }
            },
            {
                "name": "RedfishExtensions.v1_0_0",
                "definitions": {
                    "Uris": {"kind": "Term", "name": "Uris", "type": "Collection(Edm.String)"},
                    "DynamicPropertyPatterns": {"kind": "Term", "name": "DynamicPropertyPatterns", "type": "Collection(Edm.String)"},
                    "ExcerptCopy": {"kind": "Term", "name": "ExcerptCopy", "type": "Edm.String"}
                }
            }
        ]
    })
}

pub fn resource_document() -> Value {
    json!({
        "label": "Resource_v1.json",
        "references": [
            {
                "uri": "http://docs.oasis-open.org/odata/odata/v4.0/errata03/csd01/complete/vocabularies/Org.OData.Core.V1.xml",
                "includes": {"OData": "Org.OData.Core.V1"}
            }
        ],
        "namespaces": [
            {
                "name": "Resource",
                "definitions": {
                    "Health": {
                        "kind": "EnumType",
                        "name": "Health",
                        "members": {"OK": {}, "Warning": {}, "Critical": {}}
                    },
                    "Oem": {
                        "kind": "ComplexType",
                        "name": "Oem",
                        "annotations": {"OData.AdditionalProperties": {"Bool": true}}
                    }
                }
            },
            {
                "name": "Resource.v1_0_0",
                "definitions": {
                    "Resource": {
                        "kind": "EntityType",
                        "name": "Resource",
                        "abstract": true,
                        "properties": properties(&[
                            ("Id", "Edm.String"),
                            ("Name", "Edm.String"),
                            ("Description", "Edm.String")
                        ])
                    },
                    "Status": {
                        "kind": "ComplexType",
                        "name": "Status",
                        "properties": properties(&[("Health", "Resource.Health"), ("State", "Edm.String")])
                    },
                    "Location": {
                        "kind": "ComplexType",
                        "name": "Location",
                        "properties": properties(&[("Info", "Edm.String")])
                    }
                }
            },
            {
                "name": "Resource.v1_1_0",
                "definitions": {
                    "Location": {
                        "kind": "ComplexType",
                        "name": "Location",
                        "properties": properties(&[("Info", "Edm.String"), ("PartLocation", "Edm.String")])
                    }
                }
            }
        ]
    })
}

pub fn widget_document() -> Value {
    let mut widget_props = properties(&[
        ("Color", "Edm.String"),
        ("Count", "Edm.Int64"),
        ("Ratio", "Edm.Double"),
        ("Enabled", "Edm.Boolean"),
        ("Uuid", "Edm.Guid"),
        ("Updated", "Edm.DateTimeOffset"),
        ("Interval", "Edm.Duration"),
        ("Legacy", "Edm.Int32"),
        ("Mode", "Widget.v1_0_0.Mode"),
        ("Label", "Widget.v1_0_0.LabelString"),
        ("Tags", "Collection(Edm.String)"),
        ("Status", "Resource.Status"),
        ("Location", "Resource.Location"),
        ("Settings", "Widget.v1_0_0.Settings"),
        ("Custom", "Widget.v1_0_0.Custom"),
        ("Actions", "Widget.v1_0_0.Actions"),
        ("Oem", "Resource.Oem"),
    ]);
    widget_props.insert(
        "Serial".into(),
        json!({
            "name": "Serial",
            "type": "Edm.String",
            "annotations": {"Validation.Pattern": {"String": "/^[A-Z0-9]+$"}}
        }),
    );
    widget_props.insert("Chassis".into(), navigation("Chassis", "Chassis.Chassis"));
    widget_props.insert("Peers".into(), navigation("Peers", "Collection(Widget.Widget)"));
    widget_props.insert(
        "ChassisSummary".into(),
        json!({
            "name": "ChassisSummary",
            "type": "Chassis.Chassis",
            "kind": "Navigation",
            "annotations": {"Redfish.ExcerptCopy": "Empty"}
        }),
    );

    json!({
        "label": "Widget_v1.json",
        "references": [
            {
                "uri": "http://docs.oasis-open.org/odata/odata/v4.0/errata03/csd01/complete/vocabularies/Org.OData.Core.V1.xml",
                "includes": {"OData": "Org.OData.Core.V1"}
            },
            {
                "uri": "http://docs.oasis-open.org/odata/odata/v4.0/errata03/csd01/complete/vocabularies/Org.OData.Validation.V1.xml",
                "includes": {"Validation": "Org.OData.Validation.V1"}
            },
            {
                "uri": "http://redfish.dmtf.org/schemas/v1/RedfishExtensions_v1.xml",
                "includes": {"Redfish": "RedfishExtensions.v1_0_0"}
            },
            {
                "uri": "http://redfish.dmtf.org/schemas/v1/Resource_v1.xml",
                "includes": {"Resource": "Resource", "Resource.v1_0_0": "Resource.v1_0_0"}
            },
            {
                "uri": "http://redfish.dmtf.org/schemas/v1/Chassis_v1.xml",
                "includes": {"Chassis": "Chassis"}
            }
        ],
        "namespaces": [
            {
                "name": "Widget",
                "annotations": {"OData.Description": {"String": "A widget."}},
                "definitions": {
                    "Widget": {
                        "kind": "EntityType",
                        "name": "Widget",
                        "baseType": "Resource.v1_0_0.Resource",
                        "abstract": true,
                        "annotations": {
                            "Redfish.Uris": {"Collection": [
                                {"String": "/redfish/v1/Widgets/{WidgetId}"},
                                {"String": "/redfish/v1/Systems/{ComputerSystemId}/Widgets/{WidgetId}"}
                            ]}
                        }
                    },
                    "Reset": {
                        "kind": "Action",
                        "name": "Reset",
                        "isBound": true,
                        "parameters": [
                            {"name": "Widget", "type": "Widget.v1_0_0.Actions"},
                            {"name": "ResetType", "type": "Edm.String"}
                        ]
                    }
                }
            },
            {
                "name": "Widget.v1_0_0",
                "definitions": {
                    "Widget": {
                        "kind": "EntityType",
                        "name": "Widget",
                        "baseType": "Widget.Widget",
                        "properties": widget_props
                    },
                    "Settings": {
                        "kind": "ComplexType",
                        "name": "Settings",
                        "properties": properties(&[("Speed", "Edm.Int64")])
                    },
                    "Custom": {
                        "kind": "ComplexType",
                        "name": "Custom",
                        "annotations": {"Redfish.DynamicPropertyPatterns": {"Collection": []}}
                    },
                    "Actions": {
                        "kind": "ComplexType",
                        "name": "Actions",
                        "properties": properties(&[("Oem", "Resource.Oem")])
                    },
                    "Mode": {
                        "kind": "EnumType",
                        "name": "Mode",
                        "members": {"Bar": {}, "Baz": {}}
                    },
                    "LabelString": {
                        "kind": "TypeDefinition",
                        "name": "LabelString",
                        "underlyingType": "Edm.String",
                        "annotations": {"Validation.Pattern": {"String": "^[a-z]+$"}}
                    }
                }
            },
            {
                "name": "Widget.v1_1_0",
                "definitions": {
                    "Widget": {
                        "kind": "EntityType",
                        "name": "Widget",
                        "baseType": "Widget.v1_0_0.Widget",
                        "properties": properties(&[("Weight", "Edm.Double")])
                    },
                    "Settings": {
                        "kind": "ComplexType",
                        "name": "Settings",
                        "properties": properties(&[("Speed", "Edm.Int64"), ("Turbo", "Edm.Boolean")])
                    }
                }
            }
        ]
    })
}

pub fn chassis_document() -> Value {
    json!({
        "label": "Chassis_v1.json",
        "namespaces": [
            {
                "name": "Chassis",
                "definitions": {
                    "Chassis": {
                        "kind": "EntityType",
                        "name": "Chassis",
                        "baseType": "Resource.v1_0_0.Resource",
                        "abstract": true
                    }
                }
            },
            {
                "name": "Chassis.v1_0_0",
                "definitions": {
                    "Chassis": {
                        "kind": "EntityType",
                        "name": "Chassis",
                        "baseType": "Chassis.Chassis",
                        "properties": properties(&[("Model", "Edm.String")])
                    }
                }
            }
        ]
    })
}

pub fn document(value: Value) -> SchemaDocument {
    serde_json::from_value(value).expect("fixture document should deserialize")
}

/// The widget schema graph
pub fn fixture_store() -> SchemaStore {
    SchemaStore::builder()
        .add_root(document(widget_document()))
        .add_root(document(resource_document()))
        .add_root(document(chassis_document()))
        .add_override(document(vocabulary_document()))
        .build()
        .expect("fixture store should build")
}
