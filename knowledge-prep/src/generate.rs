use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hmo_intake::{Hmo, MembershipTier, context_loader::context_file_name};
use tracing::{info, warn};

use crate::html_to_json::files_with_extension;
use crate::model::ServicePage;

const SEPARATOR_WIDTH: usize = 50;

/// Load every `<stem>.json` page in `dir`, ordered by stem.
pub fn load_pages(dir: &Path) -> Result<Vec<(String, ServicePage)>> {
    let mut pages = Vec::new();
    for path in files_with_extension(dir, "json")? {
        let raw = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let page: ServicePage =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        pages.push((stem, page));
    }
    Ok(pages)
}

/// Plain-text medical context for one (HMO, tier) pair.
pub fn render_context(pages: &[(String, ServicePage)], hmo: Hmo, tier: MembershipTier) -> String {
    let hmo_name = hmo.hebrew();
    let tier_name = tier.hebrew();

    let mut lines = vec![format!(
        "=== נתוני שירותים רפואיים עבור {hmo_name} - {tier_name} ===\n"
    )];

    for (_, page) in pages {
        lines.push(format!("## {}", page.title));
        lines.push(String::new());

        lines.push("### תיאור כללי:".to_string());
        lines.push(page.general_description.clone());
        if let Some(specific) = page.specific_description.get(hmo_name) {
            lines.push(specific.clone());
        }
        lines.push(String::new());

        lines.push("### פירוט שירותים:".to_string());
        for service in &page.services_descriptions {
            lines.push(format!("**{}:**", service.name));
            lines.push(format!("תיאור: {}", service.description));
            match page.benefit(hmo_name, tier_name, &service.name) {
                Some(benefit) => lines.push(format!("הטבות: {benefit}")),
                None => lines.push("הטבות: לא זמין".to_string()),
            }
            lines.push(String::new());
        }

        lines.push("### מספרי טלפון:".to_string());
        lines.push(page.phone_numbers.title.clone());
        if let Some(contact) = page.phone_numbers.details.get(hmo_name) {
            lines.push(format!("{hmo_name}: {contact}"));
        }
        lines.push(String::new());

        lines.push("### מידע נוסף:".to_string());
        lines.push(page.additional_information.title.clone());
        if let Some(details) = page.additional_information.details.get(hmo_name) {
            if let Some(phone) = &details.phone {
                lines.push(format!("טלפון: {phone}"));
            }
            if let Some(website) = &details.website {
                lines.push(format!("אתר: {website}"));
            }
        }
        lines.push(String::new());

        lines.push("=".repeat(SEPARATOR_WIDTH));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Write the context file of every (HMO, tier) pair into `output`.
pub fn generate_all(json_dir: &Path, output: &Path) -> Result<Vec<PathBuf>> {
    let pages = load_pages(json_dir)?;
    if pages.is_empty() {
        warn!(folder = %json_dir.display(), "no JSON pages found; context files will be empty");
    }
    info!(categories = pages.len(), "Loaded medical service categories");

    fs::create_dir_all(output).with_context(|| format!("creating {}", output.display()))?;

    let mut written = Vec::new();
    for hmo in Hmo::ALL {
        for tier in MembershipTier::ALL {
            let target = output.join(context_file_name(hmo, tier));
            fs::write(&target, render_context(&pages, hmo, tier))
                .with_context(|| format!("writing {}", target.display()))?;
            info!(file = %target.display(), "Generated context file");
            written.push(target);
        }
    }

    info!(count = written.len(), folder = %output.display(), "Context generation complete");
    Ok(written)
}
