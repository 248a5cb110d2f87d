use regex::Regex;
use shared_types::ContactFields;

/// Phone type inferred from the text in front of a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneKind {
    Mobile,
    Business,
    Fax,
    Unknown,
}

/// Context decision table, evaluated top to bottom. A context matching
/// several rows takes the first.
///
/// Fax sits above the business row so `Office Fax:` is dropped as a fax
/// rather than stored as the office number. Mobile sits above business so
/// `Mobile Phone:` stays mobile despite the `ph` token.
const CONTEXT_TABLE: &[(&[&str], PhoneKind)] = &[
    (&["f:", "fax"], PhoneKind::Fax),
    (&["m:", "mob", "cell", "c:"], PhoneKind::Mobile),
    (&["o:", "off", "t:", "tel", "d:", "dir", "ph"], PhoneKind::Business),
];

pub fn classify_context(preceding: &str) -> PhoneKind {
    let context = preceding.to_lowercase();
    CONTEXT_TABLE
        .iter()
        .find(|(tokens, _)| tokens.iter().any(|token| context.contains(token)))
        .map(|(_, kind)| *kind)
        .unwrap_or(PhoneKind::Unknown)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneHit {
    pub line: usize,
    pub number: String,
    pub kind: PhoneKind,
}

pub fn phone_regex() -> Regex {
    Regex::new(
        r"(?i)(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}(?:\s*(?:extension|ext\.?|x)\s*\d{1,5})?",
    )
    .unwrap()
}

/// Find every phone number on a line. The context for each match is the
/// text between the previous match (or line start) and the match itself.
pub fn scan_line(regex: &Regex, line_index: usize, line: &str) -> Vec<PhoneHit> {
    let mut hits = Vec::new();
    let mut context_start = 0;

    for m in regex.find_iter(line) {
        let kind = classify_context(&line[context_start..m.start()]);
        hits.push(PhoneHit {
            line: line_index,
            number: m.as_str().trim().to_string(),
            kind,
        });
        context_start = m.end();
    }

    hits
}

/// Fill `mobile_phone` / `business_phone` from the non-fax hits.
///
/// A lone number is always stored as mobile, whatever its context says.
pub fn assign_phones(hits: &[PhoneHit], contact: &mut ContactFields) {
    let kept: Vec<&PhoneHit> = hits.iter().filter(|h| h.kind != PhoneKind::Fax).collect();

    if let [only] = kept.as_slice() {
        contact.mobile_phone = only.number.clone();
        return;
    }

    for hit in &kept {
        match hit.kind {
            PhoneKind::Mobile => contact.mobile_phone = hit.number.clone(),
            PhoneKind::Business => contact.business_phone = hit.number.clone(),
            PhoneKind::Fax | PhoneKind::Unknown => {}
        }
    }

    for hit in kept.iter().filter(|h| h.kind == PhoneKind::Unknown) {
        if contact.mobile_phone.is_empty() {
            contact.mobile_phone = hit.number.clone();
        } else if contact.business_phone.is_empty() {
            contact.business_phone = hit.number.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(number: &str, kind: PhoneKind) -> PhoneHit {
        PhoneHit {
            line: 0,
            number: number.to_string(),
            kind,
        }
    }

    #[test]
    fn test_classify_context() {
        assert_eq!(classify_context("Cell: "), PhoneKind::Mobile);
        assert_eq!(classify_context("M: "), PhoneKind::Mobile);
        assert_eq!(classify_context("Office: "), PhoneKind::Business);
        assert_eq!(classify_context("Tel "), PhoneKind::Business);
        assert_eq!(classify_context("Direct "), PhoneKind::Business);
        assert_eq!(classify_context("Fax: "), PhoneKind::Fax);
        assert_eq!(classify_context(""), PhoneKind::Unknown);
    }

    #[test]
    fn test_classify_context_priority() {
        // "mobile phone" hits both mobile and business tokens
        assert_eq!(classify_context("Mobile Phone: "), PhoneKind::Mobile);
        assert_eq!(classify_context("Office Fax: "), PhoneKind::Fax);
    }

    #[test]
    fn test_phone_regex_formats() {
        let regex = phone_regex();
        for sample in [
            "(555) 123-4567",
            "555-123-4567",
            "555.123.4567",
            "555 123 4567",
            "5551234567",
            "+1 555-123-4567",
            "1-555-123-4567",
        ] {
            let found = regex.find(sample).map(|m| m.as_str());
            assert_eq!(found, Some(sample), "pattern should match {sample}");
        }
    }

    #[test]
    fn test_phone_regex_extension() {
        let regex = phone_regex();
        let found = regex.find("Tel 555-123-4567 ext. 204").map(|m| m.as_str());
        assert_eq!(found, Some("555-123-4567 ext. 204"));

        let found = regex.find("555-123-4567 x12").map(|m| m.as_str());
        assert_eq!(found, Some("555-123-4567 x12"));
    }

    #[test]
    fn test_scan_line_splits_context() {
        let regex = phone_regex();
        let hits = scan_line(&regex, 3, "Cell: 555-111-2222  Office: 555-333-4444");

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].kind, PhoneKind::Mobile);
        assert_eq!(hits[0].number, "555-111-2222");
        assert_eq!(hits[1].kind, PhoneKind::Business);
        assert_eq!(hits[1].number, "555-333-4444");
        assert!(hits.iter().all(|h| h.line == 3));
    }

    #[test]
    fn test_single_number_is_mobile() {
        let mut contact = ContactFields::default();
        assign_phones(&[hit("555-123-4567", PhoneKind::Business)], &mut contact);

        assert_eq!(contact.mobile_phone, "555-123-4567");
        assert_eq!(contact.business_phone, "");
    }

    #[test]
    fn test_fax_never_stored() {
        let mut contact = ContactFields::default();
        assign_phones(
            &[
                hit("555-000-0000", PhoneKind::Fax),
                hit("555-123-4567", PhoneKind::Business),
            ],
            &mut contact,
        );

        // the fax is discarded, leaving a single number
        assert_eq!(contact.mobile_phone, "555-123-4567");
        assert_eq!(contact.business_phone, "");
    }

    #[test]
    fn test_typed_numbers_and_backfill() {
        let mut contact = ContactFields::default();
        assign_phones(
            &[
                hit("555-111-1111", PhoneKind::Unknown),
                hit("555-222-2222", PhoneKind::Business),
            ],
            &mut contact,
        );
        assert_eq!(contact.business_phone, "555-222-2222");
        assert_eq!(contact.mobile_phone, "555-111-1111");

        let mut contact = ContactFields::default();
        assign_phones(
            &[
                hit("555-111-1111", PhoneKind::Mobile),
                hit("555-222-2222", PhoneKind::Unknown),
                hit("555-333-3333", PhoneKind::Unknown),
            ],
            &mut contact,
        );
        assert_eq!(contact.mobile_phone, "555-111-1111");
        assert_eq!(contact.business_phone, "555-222-2222");
    }

    #[test]
    fn test_last_typed_number_wins() {
        let mut contact = ContactFields::default();
        assign_phones(
            &[
                hit("555-111-1111", PhoneKind::Mobile),
                hit("555-222-2222", PhoneKind::Mobile),
            ],
            &mut contact,
        );
        assert_eq!(contact.mobile_phone, "555-222-2222");
        assert_eq!(contact.business_phone, "");
    }
}
