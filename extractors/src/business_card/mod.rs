mod keywords;
mod lines;
mod phone;

pub use keywords::{ADDRESS_KEYWORDS, COMPANY_SUFFIXES, TITLE_KEYWORDS};
pub use phone::{classify_context, PhoneKind};

use keywords::{has_digit, token_count, Keywords, MAX_NAME_TOKENS, MAX_TITLE_TOKENS, MIN_NAME_LEN};
use lines::CardLines;
use phone::{assign_phones, phone_regex, scan_line};
use regex::Regex;
use shared_types::{ContactFields, ExtractionMethod, Extractor};
use tracing::debug;

/// Heuristic extractor for OCR text of business cards.
///
/// Runs a fixed sequence of passes over the non-blank lines. Each pass only
/// looks at lines no earlier pass has claimed, so a line ends up in at most
/// one field (phones excepted, they may share a line with anything).
pub struct BusinessCardExtractor {
    email: Regex,
    phone: Regex,
    url: Regex,
    zip: Regex,
    keywords: Keywords,
}

impl BusinessCardExtractor {
    pub fn new() -> Self {
        Self {
            email: Regex::new(r"[\w.-]+@[\w.-]+\.\w+").unwrap(),
            phone: phone_regex(),
            url: Regex::new(r"(?i)\b(?:https?://)?((?:[a-z0-9-]+\.)+[a-z]{2,6})\b(?:/\S*)?")
                .unwrap(),
            zip: Regex::new(r"\b\d{5}(?:-\d{4})?\b").unwrap(),
            keywords: Keywords::new(),
        }
    }

    pub fn extract_fields(&self, raw_text: &str) -> ContactFields {
        let mut lines = CardLines::new(raw_text);
        let mut contact = ContactFields::default();
        if lines.is_empty() {
            return contact;
        }

        self.email_pass(&mut lines, &mut contact);
        self.phone_pass(&mut lines, &mut contact);
        let site_company = self.url_pass(&mut lines);
        self.address_pass(&mut lines, &mut contact);
        self.title_pass(&mut lines, &mut contact);
        self.company_pass(&mut lines, &mut contact, site_company);
        self.name_pass(&lines, &mut contact);

        debug!(
            lines = lines.len(),
            filled = ?contact.filled_fields(),
            "Business card extraction finished"
        );

        contact
    }

    fn email_pass(&self, lines: &mut CardLines, contact: &mut ContactFields) {
        for (index, line) in lines.unused() {
            if let Some(m) = self.email.find(line) {
                if contact.email.is_empty() {
                    contact.email = m.as_str().to_string();
                }
                lines.mark_used(index);
                debug!(line = index, "Email pass claimed line");
            }
        }
    }

    fn phone_pass(&self, lines: &mut CardLines, contact: &mut ContactFields) {
        let hits: Vec<_> = lines
            .all()
            .flat_map(|(index, line)| scan_line(&self.phone, index, line))
            .collect();

        for hit in hits.iter().filter(|h| h.kind != PhoneKind::Fax) {
            lines.mark_used(hit.line);
            debug!(line = hit.line, kind = ?hit.kind, "Phone pass claimed line");
        }

        assign_phones(&hits, contact);
    }

    /// Returns the website-derived company name, if any
    fn url_pass(&self, lines: &mut CardLines) -> Option<String> {
        for (index, line) in lines.unused() {
            let Some(host) = self
                .url
                .captures_iter(line)
                .filter(|caps| self.is_website(caps))
                .find_map(|caps| caps.get(1))
            else {
                continue;
            };
            lines.mark_used(index);
            debug!(line = index, "URL pass claimed line");

            return domain_label(host.as_str());
        }
        None
    }

    /// A match needs a scheme, a `www.` host or a known lowercase TLD
    fn is_website(&self, caps: &regex::Captures) -> bool {
        let (Some(full), Some(host)) = (caps.get(0), caps.get(1)) else {
            return false;
        };
        let full = full.as_str().to_ascii_lowercase();
        let host = host.as_str();

        full.starts_with("http://")
            || full.starts_with("https://")
            || host.to_ascii_lowercase().starts_with("www.")
            || host
                .rsplit('.')
                .next()
                .is_some_and(|tld| self.keywords.is_web_tld(tld))
    }

    fn address_pass(&self, lines: &mut CardLines, contact: &mut ContactFields) {
        let unused = lines.unused();

        if let Some((zip_index, city_line)) =
            unused.iter().copied().find(|(_, line)| self.zip.is_match(line))
        {
            lines.mark_used(zip_index);
            let mut address = city_line.to_string();

            if let Some(street_index) = zip_index.checked_sub(1) {
                if let Some(street) = lines.get(street_index) {
                    if !lines.is_used(street_index)
                        && (has_digit(street) || self.keywords.has_address_keyword(street))
                    {
                        lines.mark_used(street_index);
                        address = format!("{street}\n{city_line}");
                    }
                }
            }

            debug!(line = zip_index, "Address pass claimed zip line");
            contact.address = address;
            return;
        }

        if let Some((index, line)) = unused
            .into_iter()
            .find(|(_, line)| has_digit(line) && self.keywords.has_address_keyword(line))
        {
            lines.mark_used(index);
            contact.address = line.to_string();
            debug!(line = index, "Address pass claimed keyword line");
        }
    }

    fn title_pass(&self, lines: &mut CardLines, contact: &mut ContactFields) {
        if let Some((index, line)) = lines.unused().into_iter().find(|(_, line)| {
            token_count(line) < MAX_TITLE_TOKENS && self.keywords.has_title_keyword(line)
        }) {
            lines.mark_used(index);
            contact.job_title = line.to_string();
            debug!(line = index, "Title pass claimed line");
        }
    }

    fn company_pass(
        &self,
        lines: &mut CardLines,
        contact: &mut ContactFields,
        site_company: Option<String>,
    ) {
        match lines
            .unused()
            .into_iter()
            .find(|(_, line)| self.keywords.has_company_suffix(line))
        {
            Some((index, line)) => {
                lines.mark_used(index);
                contact.company = line.to_string();
                debug!(line = index, "Company pass claimed line");
            }
            None => {
                if let Some(name) = site_company {
                    debug!(company = %name, "Company taken from website domain");
                    contact.company = name;
                }
            }
        }
    }

    fn name_pass(&self, lines: &CardLines, contact: &mut ContactFields) {
        let candidate = lines.unused().into_iter().find(|(_, line)| {
            token_count(line) <= MAX_NAME_TOKENS
                && !has_digit(line)
                && line.chars().count() >= MIN_NAME_LEN
        });

        let Some((index, line)) = candidate else {
            return;
        };

        let mut tokens = line.split_whitespace();
        if let Some(first) = tokens.next() {
            contact.first_name = first.to_string();
        }
        contact.last_name = tokens.collect::<Vec<_>>().join(" ");
        debug!(line = index, "Name pass claimed line");
    }
}

impl Default for BusinessCardExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for BusinessCardExtractor {
    fn extract(&self, raw_text: &str) -> ContactFields {
        self.extract_fields(raw_text)
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PatternBased
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

/// `www.acme-widgets.com` -> `Acme-widgets`
fn domain_label(host: &str) -> Option<String> {
    let mut labels: Vec<&str> = host
        .split('.')
        .filter(|label| !label.is_empty())
        .collect();
    labels.pop(); // TLD
    let label = labels
        .into_iter()
        .find(|label| !label.eq_ignore_ascii_case("www"))?;

    let mut chars = label.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}
