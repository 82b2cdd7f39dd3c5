//! Models used by the demo binary.

use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use modelform::value::Value;
use modelform::validators::{all, email, int_range, parse_date, pattern, required, required_when};
use modelform::{Attribute, DeclaredType, EnumDecl, ModelDecl, Result};

pub type VoteCounter = Arc<Mutex<IndexMap<String, u64>>>;

fn text(name: &str) -> Attribute {
    Attribute::new(name, DeclaredType::primitive("str")).with_default("")
}

fn record_default(model: &Arc<ModelDecl>) -> impl Fn() -> Value + Send + Sync + 'static {
    let model = model.clone();
    move || model.default_value().unwrap_or_default()
}

pub fn person() -> Result<Arc<ModelDecl>> {
    let contact_options = Arc::new(
        EnumDecl::new("ContactOptions")
            .variant("EMAIL", "email")
            .variant("PHONE", "phone"),
    );

    let address = Arc::new(
        ModelDecl::new("Address")
            .attribute(text("street"))
            .attribute(text("city"))
            .attribute(text("zip").with_title("ZIP code")),
    );

    let actor = Arc::new(
        ModelDecl::new("Actor")
            .attribute(text("first_name").with_rule(required("first name is required")))
            .attribute(text("last_name"))
            .with_display(|value| {
                let first = value.get("first_name").map(Value::to_string).unwrap_or_default();
                let last = value.get("last_name").map(Value::to_string).unwrap_or_default();
                format!("{first} {last}").trim().to_string()
            }),
    );

    let movie = Arc::new(
        ModelDecl::new("Movie")
            .attribute(text("title").with_rule(required("title is required")))
            .attribute(
                Attribute::new("year", DeclaredType::primitive("int"))
                    .with_default(2000)
                    .with_rule(int_range(1888, 2100)),
            )
            .attribute(
                Attribute::new("actors", DeclaredType::list_of(DeclaredType::record(actor)))
                    .with_default_factory(|| Value::List(Vec::new())),
            )
            .with_display(|value| {
                let title = value.get("title").map(Value::to_string).unwrap_or_default();
                let year = value.get("year").map(Value::to_string).unwrap_or_default();
                format!("{title} ({year})")
            }),
    );

    let phone_rule = all(vec![
        required_when("contact_preference", "phone", "phone is required"),
        pattern(r"^$|^\+?[0-9 ()-]{6,}$", "not a phone number")?,
    ]);

    Ok(Arc::new(
        ModelDecl::new("Person")
            .attribute(text("first_name").with_rule(required("first name is required")))
            .attribute(text("last_name"))
            .attribute(
                Attribute::new("birthdate", DeclaredType::optional(DeclaredType::primitive("date")))
                    .with_default(Value::None)
                    .with_description("YYYY-MM-DD")
                    .with_rule(parse_date()),
            )
            .attribute(Attribute::new("happy_today", DeclaredType::primitive("bool")).with_default(true))
            .attribute(Attribute::new("height", DeclaredType::primitive("float")).with_default(1.75))
            .attribute(
                Attribute::new("address", DeclaredType::record(address.clone()))
                    .with_default_factory(record_default(&address)),
            )
            .attribute(
                Attribute::new("contact_preference", DeclaredType::enumeration(contact_options))
                    .with_default("email"),
            )
            .attribute(
                Attribute::new("email", DeclaredType::primitive("EmailStr"))
                    .with_default("")
                    .with_rule(all(vec![
                        required_when("contact_preference", "email", "email is required"),
                        email(true),
                    ])),
            )
            .attribute(text("phone").with_rule(phone_rule))
            .attribute(
                Attribute::new("movies", DeclaredType::list_of(DeclaredType::record(movie)))
                    .with_default_factory(|| Value::List(Vec::new())),
            ),
    ))
}

pub fn poll() -> Arc<ModelDecl> {
    let language = Arc::new(
        EnumDecl::new("Language")
            .variant("RUST", "rust")
            .variant("PYTHON", "python")
            .variant("GO", "go")
            .variant("TYPESCRIPT", "typescript"),
    );
    Arc::new(
        ModelDecl::new("Poll").attribute(
            Attribute::new("language", DeclaredType::enumeration(language))
                .with_title("Favourite language")
                .with_default("rust"),
        ),
    )
}

/// Adds one vote for the submitted language.
pub fn record_vote(counter: &VoteCounter, value: &Value) {
    let Some(choice) = value.get("language").and_then(Value::as_text) else {
        return;
    };
    if let Ok(mut votes) = counter.lock() {
        *votes.entry(choice.to_string()).or_insert(0) += 1;
    }
}
