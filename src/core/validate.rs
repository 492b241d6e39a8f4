// input checks for generate requests
// the gateway only requires both fields; the ui applies the full set

pub const MAX_QUERY_CHARS: usize = 1000;

pub struct Validation {
    pub errors: Vec<String>,
}

impl Validation {
    /// Both fields present and not blank.
    pub fn required(user_id: &str, query: &str) -> Self {
        let mut errors = Vec::new();

        if user_id.trim().is_empty() {
            errors.push("user id cannot be empty".to_string());
        }
        if query.trim().is_empty() {
            errors.push("query cannot be empty or just whitespace".to_string());
        }

        Self { errors }
    }

    /// Required fields plus length and charset limits.
    pub fn check(user_id: &str, query: &str) -> Self {
        let mut validation = Self::required(user_id, query);

        // only meaningful once the query has content
        if !query.trim().is_empty() {
            if query.chars().count() > MAX_QUERY_CHARS {
                validation
                    .errors
                    .push(format!("query cannot exceed {MAX_QUERY_CHARS} characters"));
            } else if !query.chars().all(is_printable) {
                validation.errors.push(
                    "query contains invalid characters, use printable characters only".to_string(),
                );
            }
        }

        validation
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn message(&self) -> String {
        self.errors.join("; ")
    }
}

// printable ascii plus the usual whitespace
fn is_printable(c: char) -> bool {
    c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}
