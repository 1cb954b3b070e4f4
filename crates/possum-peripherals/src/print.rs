//! Receipt printing.
//!
//! The receipt region is rendered by someone else; the print action only
//! reads its markup when a print is requested, wraps it in a styled page and
//! derives a plain-text rendition for line printers.

use std::sync::{Arc, RwLock};

use possum_hardware::{PrintJob, ReceiptPrinter};
use tracing::{debug, info, warn};

use crate::error::{ActionError, Result};
use crate::notify::Notifier;

/// Title of the print window.
pub const RECEIPT_TITLE: &str = "Receipt";

/// Alert shown when the print target refused the job.
pub const POPUP_BLOCKED_ALERT: &str = "Please allow pop-ups to print receipts";

const RECEIPT_STYLE: &str = "\
body { font-family: 'Courier New', monospace; font-size: 12px; width: 80mm; margin: 0 auto; padding: 4mm; }
table { width: 100%; border-collapse: collapse; }
td, th { padding: 2px 0; text-align: left; }
.text-right { text-align: right; }
.text-center { text-align: center; }
hr { border: none; border-top: 1px dashed #000; }
@media print { @page { margin: 0; } }";

/// Provider of the current receipt markup.
pub trait ReceiptSource: Send + Sync {
    /// Markup of the receipt region, `None` when the region does not exist.
    fn receipt_markup(&self) -> Option<String>;
}

/// Receipt region shared with whoever renders it.
///
/// # Examples
///
/// ```
/// use possum_peripherals::print::{ReceiptSource, SharedReceipt};
///
/// let receipt = SharedReceipt::new();
/// let renderer = receipt.clone();
/// renderer.set("<p>Total: KSh 100</p>");
///
/// assert_eq!(receipt.receipt_markup().as_deref(), Some("<p>Total: KSh 100</p>"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedReceipt {
    markup: Arc<RwLock<Option<String>>>,
}

impl SharedReceipt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, markup: impl Into<String>) {
        if let Ok(mut current) = self.markup.write() {
            *current = Some(markup.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut current) = self.markup.write() {
            *current = None;
        }
    }
}

impl ReceiptSource for SharedReceipt {
    fn receipt_markup(&self) -> Option<String> {
        self.markup.read().ok().and_then(|markup| markup.clone())
    }
}

/// Assemble the print job for `markup`.
///
/// # Errors
///
/// Returns `ActionError::MissingContent` when the markup is blank.
pub fn build_print_job(markup: &str) -> Result<PrintJob> {
    let markup = markup.trim();
    if markup.is_empty() {
        return Err(ActionError::MissingContent);
    }

    let html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{RECEIPT_TITLE}</title>\n<style>\n{RECEIPT_STYLE}\n</style>\n</head>\n<body>\n{markup}\n</body>\n</html>\n"
    );

    Ok(PrintJob {
        title: RECEIPT_TITLE.to_string(),
        html,
        text: markup_to_text(markup),
    })
}

/// Read the receipt and submit it to `printer`.
///
/// Failures are alerted through `notifier` before being returned.
///
/// # Errors
///
/// Returns `ActionError::MissingContent` when there is nothing to print,
/// `ActionError::TargetUnavailable` when the printer refused the job and
/// `ActionError::Hardware` for any other printer failure.
pub async fn print_receipt<S, P>(source: &S, printer: &mut P, notifier: &dyn Notifier) -> Result<()>
where
    S: ReceiptSource + ?Sized,
    P: ReceiptPrinter,
{
    let result = submit(source, printer).await;
    if let Err(err) = &result {
        warn!(error = %err, "Receipt print aborted");
        notifier.alert(&alert_text(err));
    }
    result
}

async fn submit<S, P>(source: &S, printer: &mut P) -> Result<()>
where
    S: ReceiptSource + ?Sized,
    P: ReceiptPrinter,
{
    let markup = source.receipt_markup().unwrap_or_default();
    let job = build_print_job(&markup)?;

    debug!(bytes = job.html.len(), "Submitting receipt");
    printer.print(&job).await.map_err(ActionError::from_printer)?;

    info!("Receipt sent to printer");
    Ok(())
}

fn alert_text(err: &ActionError) -> String {
    match err {
        ActionError::TargetUnavailable(_) => POPUP_BLOCKED_ALERT.to_string(),
        other => other.to_string(),
    }
}

/// Plain-text rendition of receipt markup.
///
/// Tags are dropped, block-level tags and `<br>` break lines, `<td>`/`<th>`
/// cells are separated by a space, `<style>`/`<script>` bodies are skipped
/// and the common entities are decoded. Blank lines collapse.
pub fn markup_to_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    let mut skipping: Option<&'static str> = None;

    while let Some(open) = rest.find('<') {
        if skipping.is_none() {
            push_text(&mut out, &rest[..open]);
        }
        let Some(close) = rest[open..].find('>') else {
            // Unterminated tag: keep it as text
            if skipping.is_none() {
                push_text(&mut out, &rest[open..]);
            }
            rest = "";
            break;
        };

        let tag = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let closing = tag.starts_with('/');
        let name: String = tag
            .trim_start_matches('/')
            .chars()
            .take_while(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if let Some(skipped) = skipping {
            if closing && name == skipped {
                skipping = None;
            }
            continue;
        }

        match name.as_str() {
            "style" if !closing => skipping = Some("style"),
            "script" if !closing => skipping = Some("script"),
            "br" | "hr" | "p" | "div" | "tr" | "li" | "table" | "h1" | "h2" | "h3" | "h4"
            | "h5" | "h6" => out.push('\n'),
            "td" | "th" if closing => out.push(' '),
            _ => {}
        }
    }
    if skipping.is_none() {
        push_text(&mut out, rest);
    }

    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_text(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        push_collapsed(out, &rest[..amp]);
        let entity = rest[amp..].find(';').and_then(|end| {
            decode_entity(&rest[amp + 1..amp + end]).map(|c| (c, amp + end + 1))
        });
        match entity {
            Some((c, next)) => {
                out.push(c);
                rest = &rest[next..];
            }
            None => {
                out.push('&');
                rest = &rest[amp + 1..];
            }
        }
    }
    push_collapsed(out, rest);
}

/// Append `text` with whitespace runs (source newlines included) as one space.
fn push_collapsed(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.ends_with([' ', '\n']) && !out.is_empty() {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<p>Total</p>", "Total")]
    #[case("Item<br>Qty", "Item\nQty")]
    #[case("<div>A</div><div>B</div>", "A\nB")]
    #[case("<tr><td>Milk</td><td>120</td></tr>", "Milk 120")]
    #[case("Fish &amp; Chips &lt;2&gt;", "Fish & Chips <2>")]
    #[case("KSh&nbsp;100 &#65;&#x42; &bogus;", "KSh 100 AB &bogus;")]
    #[case("<style>p { color: red; }</style><p>Paid</p>", "Paid")]
    #[case("<script>alert(1)</script>Change", "Change")]
    #[case("a <b", "a <b")]
    #[case("<p>  spaced\n   out  </p>", "spaced out")]
    fn test_markup_to_text(#[case] markup: &str, #[case] expected: &str) {
        assert_eq!(markup_to_text(markup), expected);
    }

    #[test]
    fn test_print_job_wraps_markup() {
        let job = build_print_job("<h3>Possum Mart</h3><p>Total: KSh 250</p>").unwrap();

        assert_eq!(job.title, RECEIPT_TITLE);
        assert!(job.html.starts_with("<!DOCTYPE html>"));
        assert!(job.html.contains("<style>"));
        assert!(job.html.contains("<p>Total: KSh 250</p>"));
        assert_eq!(job.text, "Possum Mart\nTotal: KSh 250");
    }

    #[rstest]
    #[case("")]
    #[case("   \n ")]
    fn test_blank_markup_rejected(#[case] markup: &str) {
        assert!(matches!(
            build_print_job(markup),
            Err(ActionError::MissingContent)
        ));
    }

    #[test]
    fn test_shared_receipt_clear() {
        let receipt = SharedReceipt::new();
        assert_eq!(receipt.receipt_markup(), None);

        receipt.set("<p>x</p>");
        receipt.clear();
        assert_eq!(receipt.receipt_markup(), None);
    }
}
