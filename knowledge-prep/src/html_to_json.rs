use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use hmo_intake::{Hmo, MembershipTier};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::model::{ContactDetails, ServiceDescription, ServicePage, TitledSection};

/// Phrase in the second paragraph naming all three HMOs.
const ALL_HMOS_PHRASE: &str = r#"קופות החולים "מכבי", "מאוחדת" ו"כללית""#;
const PHONE_PREFIX: &str = "טלפון:";
const MORE_INFO_PREFIX: &str = "מידע נוסף:";

static H2: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").expect("Invalid selector"));
static H3: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").expect("Invalid selector"));
static P: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").expect("Invalid selector"));
static UL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul").expect("Invalid selector"));
static LI: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").expect("Invalid selector"));
static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("Invalid selector"));
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("Invalid selector"));
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("Invalid selector"));
static A: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("Invalid selector"));
static BR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<br[^>]*>").expect("Invalid regex"));

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| text_of(el).trim().to_string())
}

/// The first `<ul>` following `element` at the same level.
fn next_list(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "ul")
}

/// Matches `<strong>{tier}:</strong>` and captures the text up to the next
/// tag, allowing `<br>` line breaks.
fn tier_pattern(tier: MembershipTier) -> Result<Regex> {
    let pattern = format!(
        r"<strong>{}:</strong>\s*([^<]*(?:<br[^>]*>[^<]*)*)",
        regex::escape(tier.hebrew())
    );
    Regex::new(&pattern).context("building tier pattern")
}

/// Extract the structured content of one service category page.
pub fn parse_service_page(html: &str) -> Result<ServicePage> {
    let document = Html::parse_document(html);

    let title = first_text(&document, &H2).context("page has no <h2> title")?;

    let paragraphs: Vec<String> = document
        .select(&P)
        .map(|p| text_of(p).trim().to_string())
        .collect();
    let general_description = paragraphs
        .first()
        .cloned()
        .context("page has no description paragraph")?;
    let shared_description = paragraphs.get(1).cloned().unwrap_or_default();

    let specific_description = Hmo::ALL
        .iter()
        .map(|hmo| {
            let single = format!(r#"קופת החולים "{}""#, hmo.hebrew());
            (
                hmo.hebrew().to_string(),
                shared_description.replace(ALL_HMOS_PHRASE, &single),
            )
        })
        .collect();

    let services_descriptions = document
        .select(&UL)
        .next()
        .map(|ul| {
            ul.select(&LI)
                .filter_map(|li| {
                    let text = text_of(li);
                    let (name, description) = text.trim().split_once(':')?;
                    Some(ServiceDescription {
                        name: name.trim().to_string(),
                        description: description.trim().to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let mut page = ServicePage {
        title,
        general_description,
        specific_description,
        services_descriptions,
        ..ServicePage::default()
    };

    parse_services_table(&document, &mut page)?;

    let headings: Vec<ElementRef<'_>> = document.select(&H3).collect();
    if let Some(heading) = headings.first() {
        page.phone_numbers = parse_phone_numbers(*heading);
    }
    if let Some(heading) = headings.get(1) {
        page.additional_information = parse_additional_info(*heading);
    }

    Ok(page)
}

fn parse_services_table(document: &Html, page: &mut ServicePage) -> Result<()> {
    let Some(table) = document.select(&TABLE).next() else {
        debug!(title = %page.title, "page has no services table");
        return Ok(());
    };

    let patterns = MembershipTier::ALL
        .iter()
        .map(|tier| Ok((*tier, tier_pattern(*tier)?)))
        .collect::<Result<Vec<_>>>()?;

    for hmo in Hmo::ALL {
        let tiers = page
            .services_details
            .entry(hmo.hebrew().to_string())
            .or_default();
        for tier in MembershipTier::ALL {
            tiers.entry(tier.hebrew().to_string()).or_default();
        }
    }

    // first row is the header
    for row in table.select(&TR).skip(1) {
        let cells: Vec<ElementRef<'_>> = row.select(&TD).collect();
        if cells.len() < 4 {
            continue;
        }
        let service = text_of(cells[0]).trim().to_string();

        for (hmo, cell) in Hmo::ALL.iter().zip(&cells[1..]) {
            let cell_html = cell.inner_html();
            for (tier, pattern) in &patterns {
                let Some(captures) = pattern.captures(&cell_html) else {
                    continue;
                };
                let benefit = BR.replace_all(captures[1].trim(), " ").trim().to_string();
                page.services_details
                    .entry(hmo.hebrew().to_string())
                    .or_default()
                    .entry(tier.hebrew().to_string())
                    .or_default()
                    .insert(service.clone(), benefit);
            }
        }
    }
    Ok(())
}

fn parse_phone_numbers(heading: ElementRef<'_>) -> TitledSection<String> {
    let mut details: BTreeMap<String, String> = Hmo::ALL
        .iter()
        .map(|hmo| (hmo.hebrew().to_string(), String::new()))
        .collect();

    if let Some(list) = next_list(heading) {
        for li in list.select(&LI) {
            let text = text_of(li);
            let text = text.trim();
            for hmo in Hmo::ALL {
                if text.starts_with(hmo.hebrew()) {
                    let prefix = format!("{}:", hmo.hebrew());
                    details.insert(
                        hmo.hebrew().to_string(),
                        text.replace(&prefix, "").trim().to_string(),
                    );
                }
            }
        }
    }

    TitledSection {
        title: text_of(heading).trim().to_string(),
        details,
    }
}

fn parse_additional_info(heading: ElementRef<'_>) -> TitledSection<ContactDetails> {
    let mut details: BTreeMap<String, ContactDetails> = Hmo::ALL
        .iter()
        .map(|hmo| (hmo.hebrew().to_string(), ContactDetails::default()))
        .collect();

    if let Some(list) = next_list(heading) {
        for li in list.select(&LI) {
            let text = text_of(li);
            let Some(hmo) = Hmo::ALL.into_iter().find(|hmo| text.contains(hmo.hebrew())) else {
                continue;
            };

            let mut contact = ContactDetails::default();
            for line in text.lines().map(str::trim) {
                if let Some(phone) = line.strip_prefix(PHONE_PREFIX) {
                    contact.phone = Some(phone.trim().to_string());
                } else if line.starts_with(MORE_INFO_PREFIX) {
                    contact.website = li
                        .select(&A)
                        .next()
                        .and_then(|a| a.value().attr("href"))
                        .map(str::to_string);
                }
            }
            details.insert(hmo.hebrew().to_string(), contact);
        }
    }

    TitledSection {
        title: text_of(heading).trim().to_string(),
        details,
    }
}

/// Sorted paths of the files in `dir` with the given extension.
pub(crate) fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Convert every `.html` page in `input` into `<stem>.json` under `output`.
pub fn convert_dir(input: &Path, output: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output).with_context(|| format!("creating {}", output.display()))?;

    let pages = files_with_extension(input, "html")?;
    if pages.is_empty() {
        warn!(folder = %input.display(), "no HTML pages found");
    }

    let mut written = Vec::with_capacity(pages.len());
    for path in pages {
        info!(file = %path.display(), "Processing service page");
        let html =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let page = parse_service_page(&html)
            .with_context(|| format!("parsing {}", path.display()))?;

        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .context("page file name is not valid UTF-8")?;
        let target = output.join(format!("{stem}.json"));
        fs::write(&target, serde_json::to_string_pretty(&page)?)
            .with_context(|| format!("writing {}", target.display()))?;
        written.push(target);
    }

    info!(count = written.len(), folder = %output.display(), "HTML to JSON conversion complete");
    Ok(written)
}
