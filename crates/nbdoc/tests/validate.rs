use nbdoc::{validate, Document, Error};
use serde_json::json;

fn valid_v4_notebook() -> Document {
    Document::from_value(json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": [
            {
                "cell_type": "markdown",
                "id": "intro",
                "metadata": {},
                "source": ["# Title\n", "Some prose."]
            },
            {
                "cell_type": "code",
                "id": "c1",
                "metadata": {},
                "execution_count": 1,
                "source": "print(\"hello\")",
                "outputs": [
                    {"output_type": "stream", "name": "stdout", "text": "hello\n"}
                ]
            }
        ]
    }))
    .expect("notebook is an object")
}

#[test]
fn valid_notebook_passes() {
    let nb = valid_v4_notebook();
    validate(Some(&nb), None, None, None, false, None).expect("notebook conforms");
}

#[test]
fn validate_is_idempotent() {
    let nb = valid_v4_notebook();
    let first = validate(Some(&nb), None, None, None, false, None);
    let second = validate(Some(&nb), None, None, None, false, None);
    assert_eq!(first.is_ok(), second.is_ok());

    let bad = json!({"nbformat": 4, "cells": "not-a-list"});
    let first = validate(None, None, None, None, false, Some(&bad)).unwrap_err();
    let second = validate(None, None, None, None, false, Some(&bad)).unwrap_err();
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn cells_must_be_an_array() {
    let bad = json!({"nbformat": 4, "cells": "not-a-list"});
    let err = validate(None, None, None, None, false, Some(&bad)).unwrap_err();
    match err {
        Error::SchemaViolation { path, message } => {
            assert_eq!(path, "cells");
            assert!(message.contains("array"), "unexpected message: {message}");
        }
        other => panic!("expected SchemaViolation, got {other:?}"),
    }
}

#[test]
fn missing_required_root_field_is_reported() {
    let bad = json!({"nbformat": 4, "nbformat_minor": 5, "cells": []});
    let err = validate(None, None, None, None, false, Some(&bad)).unwrap_err();
    match err {
        Error::SchemaViolation { path, .. } => assert_eq!(path, "metadata"),
        other => panic!("expected SchemaViolation, got {other:?}"),
    }
}

#[test]
fn violation_path_points_into_cells() {
    let bad = json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": [{
            "cell_type": "raw",
            "id": "r1",
            "metadata": {},
            "source": 42
        }]
    });
    let err = validate(None, None, None, None, false, Some(&bad)).unwrap_err();
    match err {
        Error::SchemaViolation { path, .. } => assert_eq!(path, "cells/0/source"),
        other => panic!("expected SchemaViolation, got {other:?}"),
    }
}

#[test]
fn cell_ids_are_required_from_minor_five() {
    let nb = json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": [{"cell_type": "markdown", "metadata": {}, "source": ""}]
    });
    let err = validate(None, None, None, None, false, Some(&nb)).unwrap_err();
    match err {
        Error::SchemaViolation { path, .. } => assert_eq!(path, "cells/0/id"),
        other => panic!("expected SchemaViolation, got {other:?}"),
    }

    // Same cell is fine under 4.4 semantics.
    let nb = json!({
        "nbformat": 4,
        "nbformat_minor": 4,
        "metadata": {},
        "cells": [{"cell_type": "markdown", "metadata": {}, "source": ""}]
    });
    validate(None, None, None, None, false, Some(&nb)).expect("4.4 cell without id");
}

#[test]
fn relaxed_mode_tolerates_additional_properties() {
    let nb = json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "custom_extension": true,
        "cells": []
    });
    let err = validate(None, None, None, None, false, Some(&nb)).unwrap_err();
    assert!(matches!(err, Error::SchemaViolation { .. }));

    validate(None, None, None, None, true, Some(&nb)).expect("relaxed accepts extra keys");
}

#[test]
fn explicit_version_overrides_declared() {
    // Declared as 4.5 but validated as 4.4, so the missing id passes.
    let nb = json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": [{"cell_type": "raw", "metadata": {}, "source": ""}]
    });
    validate(None, None, Some(4), Some(4), false, Some(&nb)).expect("validated as 4.4");
}

#[test]
fn schema_ref_selects_a_fragment() {
    let cell = json!({
        "cell_type": "code",
        "id": "c1",
        "metadata": {},
        "execution_count": null,
        "source": "1 + 1",
        "outputs": []
    });
    validate(None, Some("cell"), None, None, false, Some(&cell)).expect("cell fragment");
    validate(None, Some("code_cell"), None, None, false, Some(&cell)).expect("code_cell fragment");

    let err =
        validate(None, Some("markdown_cell"), None, None, false, Some(&cell)).unwrap_err();
    assert!(matches!(err, Error::SchemaViolation { .. }));
}

#[test]
fn unknown_schema_ref_is_not_a_violation() {
    let nb = json!({"nbformat": 4, "nbformat_minor": 5, "metadata": {}, "cells": []});
    let err = validate(None, Some("no_such_ref"), None, None, false, Some(&nb)).unwrap_err();
    match err {
        Error::UnknownSchemaRef(name) => assert_eq!(name, "no_such_ref"),
        other => panic!("expected UnknownSchemaRef, got {other:?}"),
    }
}

#[test]
fn v3_notebooks_need_worksheets() {
    let nb = json!({"nbformat": 3, "worksheets": [{"cells": []}]});
    validate(None, None, None, None, false, Some(&nb)).expect("v3 notebook");

    let bad = json!({"nbformat": 3});
    let err = validate(None, None, None, None, false, Some(&bad)).unwrap_err();
    match err {
        Error::SchemaViolation { path, .. } => assert_eq!(path, "worksheets"),
        other => panic!("expected SchemaViolation, got {other:?}"),
    }
}

#[test]
fn unsupported_major_version_is_rejected() {
    let nb = json!({"nbformat": 7, "cells": []});
    let err = validate(None, None, None, None, false, Some(&nb)).unwrap_err();
    assert!(matches!(err, Error::UnsupportedVersion(7, _)));
}

#[test]
fn missing_document_and_json_is_an_error() {
    let err = validate(None, None, None, None, false, None).unwrap_err();
    assert!(matches!(err, Error::MissingField("document")));
}
