use std::str::FromStr;

use lettre::Address;
use rocket::serde::json::Value;
use rocket::serde::Serialize;

use crate::location::{self, Location};
use crate::models::SignatureForm;

pub const NAME_MAX_CHARS: usize = 50;
/// Width of the name columns. Escaping grows a character to at most six.
pub const NAME_STORED_MAX_CHARS: usize = NAME_MAX_CHARS * 6;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const COMMENT_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A submission that passed every field rule, already escaped and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignature {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub postcode: String,
    pub location: Location,
    pub comment: Option<String>,
    pub display_name: bool,
    pub subscribe: bool,
}

pub fn validate(form: &SignatureForm) -> Result<ValidSignature, Vec<FieldError>> {
    let mut errors = Vec::new();

    let first_name = collect(&mut errors, name("firstName", "First name", &form.first_name));
    let last_name = collect(&mut errors, name("lastName", "Last name", &form.last_name));
    let email = collect(&mut errors, email(&form.email));
    let postcode = collect(&mut errors, postcode(&form.postcode));
    let comment = collect(&mut errors, comment(&form.comment));
    let display_name = collect(&mut errors, flag("displayName", &form.display_name));
    let subscribe = collect(&mut errors, flag("subscribe", &form.subscribe));

    match (
        first_name,
        last_name,
        email,
        postcode,
        comment,
        display_name,
        subscribe,
    ) {
        (
            Some(first_name),
            Some(last_name),
            Some(email),
            Some(postcode),
            Some(comment),
            Some(display_name),
            Some(subscribe),
        ) if errors.is_empty() => {
            let location = location::from_postcode(&postcode);
            Ok(ValidSignature {
                first_name,
                last_name,
                email,
                postcode,
                location,
                comment,
                display_name,
                subscribe,
            })
        }
        _ => Err(errors),
    }
}

fn collect<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    result.map_err(|e| errors.push(e)).ok()
}

/// Trimmed text of a submitted field. Absent and `null` read as empty, numbers
/// as their decimal form; anything else is `None`.
fn text(value: &Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => None,
    }
}

fn name(field: &'static str, label: &str, value: &Option<Value>) -> Result<String, FieldError> {
    let value = text(value).ok_or_else(|| FieldError::new(field, format!("{label} must be text")))?;
    if value.is_empty() {
        return Err(FieldError::new(field, format!("{label} is required")));
    }
    if value.chars().count() > NAME_MAX_CHARS {
        return Err(FieldError::new(
            field,
            format!("{label} must be at most {NAME_MAX_CHARS} characters"),
        ));
    }
    Ok(escape_html(&value))
}

fn email(value: &Option<Value>) -> Result<String, FieldError> {
    const FIELD: &str = "email";

    let value = text(value).unwrap_or_default();
    if value.is_empty() {
        return Err(FieldError::new(FIELD, "Email is required"));
    }
    if value.chars().count() > EMAIL_MAX_CHARS {
        return Err(FieldError::new(FIELD, "Email is too long"));
    }
    normalize_email(&value).ok_or_else(|| FieldError::new(FIELD, "Valid email is required"))
}

fn postcode(value: &Option<Value>) -> Result<String, FieldError> {
    match text(value) {
        Some(value) if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) => Ok(value),
        _ => Err(FieldError::new("postcode", "Valid 4-digit postcode is required")),
    }
}

fn comment(value: &Option<Value>) -> Result<Option<String>, FieldError> {
    let value = text(value).ok_or_else(|| FieldError::new("comment", "Comment must be text"))?;
    if value.is_empty() {
        return Ok(None);
    }
    if value.chars().count() > COMMENT_MAX_CHARS {
        return Err(FieldError::new(
            "comment",
            format!("Comment must be at most {COMMENT_MAX_CHARS} characters"),
        ));
    }
    Ok(Some(escape_html(&value)))
}

fn flag(field: &'static str, value: &Option<Value>) -> Result<bool, FieldError> {
    match value {
        None | Some(Value::Null) => Ok(true),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(FieldError::new(field, format!("{field} must be true or false"))),
    }
}

/// Canonical form of an address, used as the de-duplication key.
///
/// Lower-cases the whole address and strips provider-specific aliasing so that
/// `Jane.Doe+petition@GoogleMail.com` and `janedoe@gmail.com` collide.
pub fn normalize_email(raw: &str) -> Option<String> {
    let address = Address::from_str(raw.trim()).ok()?;
    let domain = address.domain().to_lowercase();
    if !domain.contains('.') {
        return None;
    }
    let user = address.user().to_lowercase();

    let (user, domain) = match domain.as_str() {
        "gmail.com" | "googlemail.com" => {
            let base = strip_tag(&user, '+').replace('.', "");
            (base, "gmail.com".to_string())
        }
        "outlook.com" | "hotmail.com" | "live.com" | "icloud.com" | "me.com" => {
            (strip_tag(&user, '+').to_string(), domain)
        }
        "yahoo.com" => (strip_tag(&user, '-').to_string(), domain),
        _ => (user, domain),
    };

    if user.is_empty() {
        return None;
    }
    Some(format!("{user}@{domain}"))
}

fn strip_tag(user: &str, separator: char) -> &str {
    user.split(separator).next().unwrap_or(user)
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
