//! Display formats for addresses.
//!
//! All three formats build on [`Address::to_array`]: lines 1–3, then a
//! "post code, city, (state)" line, then the country name, skipping
//! anything empty. The country name is passed in because resolving it is a
//! lookup, not a field.

use super::address::Address;

const HTML_SEPARATOR: &str = "<br />";
const LINE_SEPARATOR: &str = ", ";

impl Address {
    /// Address as its non-empty display lines, or `None` if there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// use addresses::domain::address::Address;
    ///
    /// let address = Address {
    ///     line_1: Some("221B Baker St".into()),
    ///     city: Some("London".into()),
    ///     post_code: Some("NW16XE".into()),
    ///     ..Address::default()
    /// };
    ///
    /// assert_eq!(
    ///     address.to_array(Some("UK")).unwrap(),
    ///     vec!["221B Baker St", "NW16XE London", "UK"],
    /// );
    /// ```
    #[must_use]
    pub fn to_array(&self, country: Option<&str>) -> Option<Vec<String>> {
        let state = self
            .state
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!("({s})"));

        let locality = [self.post_code.as_deref(), self.city.as_deref(), state.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let lines: Vec<String> = [
            self.line_1.as_deref(),
            self.line_2.as_deref(),
            self.line_3.as_deref(),
            Some(locality.as_str()),
            country,
        ]
        .into_iter()
        .flatten()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

        if lines.is_empty() {
            None
        } else {
            Some(lines)
        }
    }

    /// Address as an `<address>` block with `<br />` between lines.
    ///
    /// Lines are HTML-escaped rather than joined raw: a field containing `<`
    /// or `&` renders as text, never as markup.
    #[must_use]
    pub fn to_html(&self, country: Option<&str>) -> Option<String> {
        let lines = self.to_array(country)?;
        let body = lines
            .iter()
            .map(|line| escape_html(line))
            .collect::<Vec<_>>()
            .join(HTML_SEPARATOR);
        Some(format!("<address>{body}</address>"))
    }

    /// Address on a single comma-separated line.
    #[must_use]
    pub fn to_line(&self, country: Option<&str>) -> Option<String> {
        self.to_array(country).map(|lines| lines.join(LINE_SEPARATOR))
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
