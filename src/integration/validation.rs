//! SAMI document validation utilities

/// Validate the structure of an encoded SAMI document
pub fn validate_sami(content: &str) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Check for required tags
    for tag in ["<SAMI>", "<HEAD>", "</HEAD>", "<BODY>", "</BODY>", "</SAMI>"] {
        if !content.contains(tag) {
            errors.push(format!("Missing {} tag", tag));
        }
    }

    if !content.contains("<TITLE>") {
        warnings.push("Missing <TITLE> (players may show the file name)".to_string());
    }

    // Validate SYNC lines: numeric, strictly increasing, closed
    let sync_pattern = regex::Regex::new(r"^<SYNC Start=(\d+)><P Class=[\w-]+>(.*)</P></SYNC>$").unwrap();
    let mut last_start: Option<u64> = None;
    for line in content.lines().filter(|l| l.starts_with("<SYNC")) {
        let Some(caps) = sync_pattern.captures(line) else {
            errors.push(format!("Malformed SYNC line: {}", line));
            continue;
        };

        let start: u64 = caps[1].parse().unwrap_or(0);
        if let Some(prev) = last_start {
            if start <= prev {
                errors.push(format!(
                    "SYNC Start={} does not follow previous Start={}",
                    start, prev
                ));
            }
        }
        last_start = Some(start);

        // Payload must not contain raw markup other than <br>
        let payload = caps[2].replace("<br>", "");
        if payload.contains('<') || payload.contains('>') {
            errors.push(format!("Unescaped markup in payload: {}", &caps[2]));
        }
        let entity = regex::Regex::new(r"&(amp|lt|gt|nbsp);").unwrap();
        if entity.replace_all(&payload, "").contains('&') {
            errors.push(format!("Unescaped '&' in payload: {}", &caps[2]));
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Outcome of a validation run
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    #[allow(dead_code)]
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            errors: vec![error.into()],
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "<SAMI>
<HEAD>
<TITLE>t</TITLE>
</HEAD>
<BODY>
<SYNC Start=200><P Class=KRCC>a &amp; b<br>c</P></SYNC>
<SYNC Start=1800><P Class=KRCC>&nbsp;</P></SYNC>
</BODY>
</SAMI>
";

    #[test]
    fn test_validate_valid_document() {
        let result = validate_sami(VALID);
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_missing_body() {
        let result = validate_sami("<SAMI><HEAD></HEAD></SAMI>");
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("<BODY>")));
    }

    #[test]
    fn test_validate_out_of_order() {
        let content = VALID.replace("Start=1800", "Start=100");
        let result = validate_sami(&content);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_validate_unescaped_payload() {
        let content = VALID.replace("a &amp; b", "a & <b>");
        let result = validate_sami(&content);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
    }
}
