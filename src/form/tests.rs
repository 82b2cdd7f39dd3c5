use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use super::{Form, FormBuilder, SubmitEvent, SubmitOutcome, SubmitState};
use crate::config::{ControlStyle, FormConfig, LabelAlign};
use crate::core::value::{Value, object};
use crate::core::value_path::ValuePath;
use crate::error::FormError;
use crate::runtime::event::WidgetAction;
use crate::schema::{Attribute, DeclaredType, EnumDecl, ModelDecl};
use crate::terminal::{KeyCode, KeyEvent};
use crate::widgets::traits::ControlKind;
use crate::widgets::validators::required_when;

fn path(keys: &[&str]) -> ValuePath {
    ValuePath::from_keys(keys.iter().copied())
}

fn person() -> Arc<ModelDecl> {
    Arc::new(
        ModelDecl::new("Person")
            .attribute(Attribute::new("name", DeclaredType::primitive("str")).with_default(""))
            .attribute(Attribute::new("age", DeclaredType::primitive("int")).with_default(0)),
    )
}

fn recorder() -> (Arc<Mutex<Vec<SubmitEvent>>>, impl FnMut(&SubmitEvent) + Send + 'static) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    (events, move |event: &SubmitEvent| {
        sink.lock().expect("events").push(event.clone());
    })
}

fn contact_options() -> Arc<EnumDecl> {
    Arc::new(
        EnumDecl::new("ContactOptions")
            .variant("EMAIL", "email")
            .variant("PHONE", "phone"),
    )
}

fn contact() -> Arc<ModelDecl> {
    Arc::new(
        ModelDecl::new("Contact")
            .attribute(
                Attribute::new("contact_preference", DeclaredType::enumeration(contact_options()))
                    .with_default("email"),
            )
            .attribute(
                Attribute::new("email", DeclaredType::primitive("EmailStr"))
                    .with_default("")
                    .with_rule(required_when("contact_preference", "email", "email is required")),
            )
            .attribute(Attribute::new("phone", DeclaredType::primitive("str")).with_default("")),
    )
}

fn actor() -> Arc<ModelDecl> {
    Arc::new(
        ModelDecl::new("Actor")
            .attribute(Attribute::new("name", DeclaredType::primitive("str")).with_default("")),
    )
}

fn movie(element: Arc<ModelDecl>) -> Arc<ModelDecl> {
    Arc::new(
        ModelDecl::new("Movie")
            .attribute(Attribute::new("title", DeclaredType::primitive("str")).with_default(""))
            .attribute(
                Attribute::new("actors", DeclaredType::list_of(DeclaredType::record(element)))
                    .with_default_factory(|| Value::List(Vec::new())),
            ),
    )
}

#[test]
fn edits_commit_on_submit_with_one_notification() {
    let (events, handler) = recorder();
    let mut form = FormBuilder::new(person())
        .with_value(object([("name", Value::from("")), ("age", Value::Number(0))]))
        .on_submit(handler)
        .build()
        .expect("form");

    assert!(form.set_control_value(&path(&["name"]), Value::from("Ada")).expect("name").is_valid());
    assert!(form.set_control_value(&path(&["age"]), Value::Number(30)).expect("age").is_valid());
    assert_eq!(form.value(), &object([("name", Value::from("")), ("age", Value::Number(0))]));

    let expected = object([("name", Value::from("Ada")), ("age", Value::Number(30))]);
    assert_eq!(form.submit(), SubmitOutcome::Committed(expected.clone()));
    assert_eq!(form.value(), &expected);

    let events = events.lock().expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].value, expected);
    assert_eq!(events[0].form_id.as_str(), "person");
}

#[test]
fn cross_field_rule_rejects_then_reverts_feedback() {
    let (events, handler) = recorder();
    let mut form = FormBuilder::new(contact())
        .with_config(FormConfig::new().with_feedback_ms(1000))
        .on_submit(handler)
        .build()
        .expect("form");
    let before = form.value().clone();

    let start = Instant::now();
    let outcome = form.submit_at(start);
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(FormError::FormValidation {
            invalid: vec!["email".to_string()],
        })
    );
    assert_eq!(form.value(), &before);
    assert!(events.lock().expect("events").is_empty());
    assert_eq!(form.submit_state(), SubmitState::RejectedFeedback);
    assert!(form.submit_button().is_failed());
    assert_eq!(
        form.invalid_message().text(),
        Some("Please check the highlighted fields")
    );
    assert_eq!(
        form.field(&path(&["email"])).expect("email").message.text(),
        Some("Email is required")
    );

    assert!(!form.tick(start + Duration::from_millis(999)));
    assert_eq!(form.submit_state(), SubmitState::RejectedFeedback);
    assert!(form.tick(start + Duration::from_millis(1000)));
    assert_eq!(form.submit_state(), SubmitState::Idle);
    assert!(!form.submit_button().is_failed());
    assert!(!form.invalid_message().is_visible());
}

#[test]
fn switching_preference_satisfies_the_cross_field_rule() {
    let mut form = FormBuilder::new(contact()).build().expect("form");
    form.set_control_value(&path(&["contact_preference"]), Value::from("phone"))
        .expect("preference");
    assert!(matches!(form.submit(), SubmitOutcome::Committed(_)));
    assert_eq!(
        form.value().get("contact_preference"),
        Some(&Value::from("phone"))
    );
}

#[test]
fn four_variant_enum_uses_a_dropdown() {
    let level = Arc::new(
        EnumDecl::new("Level")
            .variant("LOW", "low")
            .variant("MEDIUM", "medium")
            .variant("HIGH", "high")
            .variant("EXTREME", "extreme"),
    );
    let model = Arc::new(
        ModelDecl::new("Alert")
            .attribute(Attribute::new("level", DeclaredType::enumeration(level)).with_default("low")),
    );
    let form = FormBuilder::new(model).build().expect("form");
    let entry = form.field(&path(&["level"])).expect("level");
    assert_eq!(entry.control.kind(), ControlKind::Dropdown);
}

#[test]
fn nested_edit_changes_only_that_leaf() {
    let address = Arc::new(
        ModelDecl::new("Address")
            .attribute(Attribute::new("street", DeclaredType::primitive("str")).with_default(""))
            .attribute(Attribute::new("city", DeclaredType::primitive("str")).with_default("")),
    );
    let model = Arc::new(
        ModelDecl::new("Person")
            .attribute(Attribute::new("name", DeclaredType::primitive("str")).with_default("Ada"))
            .attribute(
                Attribute::new("address", DeclaredType::record(address.clone()))
                    .with_default_factory(move || address.default_value().unwrap_or_default()),
            ),
    );
    let mut form = FormBuilder::new(model).build().expect("form");

    form.set_control_value(&path(&["address", "city"]), Value::from("London"))
        .expect("city");
    assert_eq!(
        form.working_copy(),
        &object([
            ("name", Value::from("Ada")),
            (
                "address",
                object([("street", Value::from("")), ("city", Value::from("London"))]),
            ),
        ])
    );
}

#[test]
fn validate_all_is_idempotent() {
    let mut form = FormBuilder::new(contact()).build().expect("form");
    let first = form.validate_all();
    let copy = form.working_copy().clone();
    let second = form.validate_all();
    assert_eq!(first, second);
    assert_eq!(form.working_copy(), &copy);
}

#[test]
fn list_add_and_delete_update_rows_and_working_copy() {
    let actors = path(&["actors"]);
    let mut form = FormBuilder::new(movie(actor())).build().expect("form");

    let index = form.list_add(&actors).expect("add");
    assert_eq!(index, 0);
    let editor = form.list_editor(&actors).expect("editor");
    assert_eq!(editor.render_rows().len(), 1);
    assert_eq!(editor.open_index(), Some(0));
    assert_eq!(
        form.working_copy().get("actors"),
        Some(&Value::List(vec![object([("name", Value::from(""))])]))
    );

    form.list_delete(&actors, 0).expect("delete");
    assert!(form.list_editor(&actors).expect("editor").render_rows().is_empty());
    assert_eq!(form.working_copy().get("actors"), Some(&Value::List(Vec::new())));
}

#[test]
fn list_add_fails_when_element_has_no_defaults() {
    let strict = Arc::new(
        ModelDecl::new("Actor").attribute(Attribute::new("name", DeclaredType::primitive("str"))),
    );
    let mut form = FormBuilder::new(movie(strict)).build().expect("form");
    let err = form.list_add(&path(&["actors"])).expect_err("no defaults");
    assert!(matches!(err, FormError::DefaultConstruction { ref model, .. } if model == "Actor"));
}

fn dr_no() -> Form {
    FormBuilder::new(movie(actor()))
        .with_value(object([
            ("title", Value::from("Dr. No")),
            ("actors", Value::List(vec![object([("name", Value::from("Sean"))])])),
        ]))
        .build()
        .expect("form")
}

// Known inconsistency: a committed list element lands in the bound value right away,
// so abandoning the parent form does not roll it back.
#[test]
fn list_element_edits_bypass_parent_rollback() {
    let actors = path(&["actors"]);
    let mut form = dr_no();

    form.list_select(&actors, 0).expect("select");
    form.list_editor_mut(&actors)
        .expect("editor")
        .panel_form_mut()
        .expect("sub-form")
        .set_control_value(&path(&["name"]), Value::from("Sean Connery"))
        .expect("name");
    let outcome = form
        .list_submit_open(&actors, Instant::now())
        .expect("list")
        .expect("open sub-form");
    assert!(matches!(outcome, SubmitOutcome::Committed(_)));

    let edited = Value::List(vec![object([("name", Value::from("Sean Connery"))])]);
    assert_eq!(form.working_copy().get("actors"), Some(&edited));
    assert_eq!(form.value().get("actors"), Some(&edited));
    assert_eq!(form.value().get("title"), Some(&Value::from("Dr. No")));

    assert!(matches!(form.submit(), SubmitOutcome::Committed(_)));
    assert_eq!(form.value().get("actors"), Some(&edited));
}

#[test]
fn keyboard_sub_form_submit_writes_element_into_bound_value() {
    let mut form = dr_no();

    form.handle_key(KeyEvent::plain(KeyCode::Tab));
    assert_eq!(form.focused_path(), Some(path(&["actors"])));
    form.handle_key(KeyEvent::plain(KeyCode::Enter));
    for ch in " C".chars() {
        form.handle_key(KeyEvent::char(ch));
    }
    form.handle_key(KeyEvent::plain(KeyCode::Tab));
    form.handle_key(KeyEvent::plain(KeyCode::Enter));

    let edited = Value::List(vec![object([("name", Value::from("Sean C"))])]);
    assert_eq!(form.list_editor(&path(&["actors"])).expect("editor").open_index(), None);
    assert_eq!(form.value().get("actors"), Some(&edited));
    assert_eq!(form.working_copy().get("actors"), Some(&edited));
}

#[test]
fn element_added_since_commit_reaches_bound_value_on_parent_submit() {
    let actors = path(&["actors"]);
    let mut form = dr_no();

    let index = form.list_add(&actors).expect("add");
    form.list_editor_mut(&actors)
        .expect("editor")
        .panel_form_mut()
        .expect("sub-form")
        .set_control_value(&path(&["name"]), Value::from("Ursula"))
        .expect("name");
    form.list_submit_open(&actors, Instant::now()).expect("list");

    assert_eq!(index, 1);
    assert_eq!(
        form.value().get("actors"),
        Some(&Value::List(vec![object([("name", Value::from("Sean"))])]))
    );
    assert!(matches!(form.submit(), SubmitOutcome::Committed(_)));
    assert_eq!(
        form.value().get("actors"),
        Some(&Value::List(vec![
            object([("name", Value::from("Sean"))]),
            object([("name", Value::from("Ursula"))]),
        ]))
    );
}

#[test]
fn failed_list_add_leaves_rows_and_working_copy_alone() {
    let tagged = Arc::new(
        ModelDecl::new("Actor")
            .attribute(Attribute::new("name", DeclaredType::primitive("str")).with_default(""))
            .attribute(
                Attribute::new("tags", DeclaredType::list_of(DeclaredType::primitive("str")))
                    .with_default_factory(|| Value::List(Vec::new())),
            ),
    );
    let actors = path(&["actors"]);
    let mut form = FormBuilder::new(movie(tagged)).build().expect("form");

    let err = form.list_add(&actors).expect_err("list of str");
    assert!(matches!(err, FormError::UnsupportedShape { ref path, .. } if path == "tags"));
    let editor = form.list_editor(&actors).expect("editor");
    assert!(editor.render_rows().is_empty());
    assert_eq!(editor.open_index(), None);
    assert_eq!(form.working_copy().get("actors"), Some(&Value::List(Vec::new())));
    assert!(form.validate_all().is_empty());
}

#[test]
fn dismissed_sub_form_leaves_list_untouched() {
    let actors = path(&["actors"]);
    let mut form = FormBuilder::new(movie(actor()))
        .with_value(object([
            ("title", Value::from("")),
            ("actors", Value::List(vec![object([("name", Value::from("Sean"))])])),
        ]))
        .build()
        .expect("form");
    form.list_select(&actors, 0).expect("select");
    form.list_editor_mut(&actors)
        .expect("editor")
        .panel_form_mut()
        .expect("sub-form")
        .set_control_value(&path(&["name"]), Value::from("Roger"))
        .expect("name");
    assert!(form.list_dismiss(&actors).expect("dismiss"));
    assert_eq!(form.list_editor(&actors).expect("editor").open_index(), None);
    let untouched = Value::List(vec![object([("name", Value::from("Sean"))])]);
    assert_eq!(form.working_copy().get("actors"), Some(&untouched));
    assert_eq!(form.value().get("actors"), Some(&untouched));
}

#[test]
fn keyboard_edit_and_submit() {
    let (events, handler) = recorder();
    let mut form = FormBuilder::new(person()).on_submit(handler).build().expect("form");

    for ch in "Ada".chars() {
        form.handle_key(KeyEvent::char(ch));
    }
    form.handle_key(KeyEvent::plain(KeyCode::Tab));
    assert_eq!(form.focused_path(), Some(path(&["age"])));
    form.handle_key(KeyEvent::plain(KeyCode::Up));
    form.handle_key(KeyEvent::plain(KeyCode::Tab));
    assert_eq!(form.focused_path(), None);

    let result = form.handle_key(KeyEvent::plain(KeyCode::Enter));
    let expected = object([("name", Value::from("Ada")), ("age", Value::Number(1))]);
    assert_eq!(
        result.actions,
        vec![WidgetAction::Submitted {
            value: expected.clone()
        }]
    );
    assert_eq!(form.value(), &expected);
    assert_eq!(events.lock().expect("events").len(), 1);
}

#[test]
fn disabled_submit_leaves_focus_cycle() {
    let mut form = FormBuilder::new(person()).build().expect("form");
    form.set_submit_enabled(false);
    form.handle_key(KeyEvent::plain(KeyCode::Tab));
    form.handle_key(KeyEvent::plain(KeyCode::Tab));
    assert_eq!(form.focused_path(), Some(path(&["name"])));
}

#[test]
fn autosave_writes_through_each_field() {
    let mut form = FormBuilder::new(person())
        .with_config(FormConfig::new().with_autosave(true))
        .build()
        .expect("form");
    form.set_control_value(&path(&["name"]), Value::from("Grace"))
        .expect("name");
    assert_eq!(form.value().get("name"), Some(&Value::from("Grace")));
}

#[test]
fn draws_title_labels_and_controls() {
    let form = FormBuilder::new(person())
        .with_value(object([("name", Value::from("Ada")), ("age", Value::Number(36))]))
        .with_config(
            FormConfig::new()
                .with_title("Person")
                .with_label_width(6)
                .with_label_align(LabelAlign::Left),
        )
        .build()
        .expect("form");

    let lines = form.draw().text_lines();
    assert_eq!(lines[0], "Person");
    assert_eq!(lines[1], "──────");
    assert_eq!(lines[2], "› Name   [ Ada ]");
    assert_eq!(lines[3], "  Age    [ 36 ] ▲▼");
    assert_eq!(lines[4], " OK ");
}

#[test]
fn draws_line_style_with_labels_on_top() {
    let form = FormBuilder::new(person())
        .with_value(object([("name", Value::from("Ada")), ("age", Value::Number(36))]))
        .with_config(
            FormConfig::new()
                .with_control_style(ControlStyle::Line)
                .with_label_align(LabelAlign::Top)
                .with_control_width(6)
                .with_padding(1)
                .with_gap(1),
        )
        .build()
        .expect("form");

    assert_eq!(
        form.draw().text_lines(),
        vec![
            " › Name".to_string(),
            "   Ada   ".to_string(),
            " ".to_string(),
            "   Age".to_string(),
            "   36     ▲▼".to_string(),
            " ".to_string(),
            "  OK ".to_string(),
        ]
    );
}
