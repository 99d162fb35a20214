//! Prompt rendering for both pipelines.
//!
//! The schema blocks are constants: response decoding depends on the field
//! names they spell out.

use crate::domain::audit::AuditSubmission;
use crate::domain::ecommerce::EcommerceRequest;

pub const TIME_AUDIT_SCHEMA: &str = r#"{
  "actionSteps": [
    { "title": "Short action title", "description": "One or two sentences on how to do it this week" },
    { "title": "...", "description": "..." },
    { "title": "...", "description": "..." }
  ],
  "solutions": ["solution 1", "solution 2", "solution 3", "solution 4", "solution 5"],
  "quickWins": ["quick win 1", "quick win 2", "quick win 3", "quick win 4"],
  "simpleWays": ["simple way 1", "simple way 2", "simple way 3", "simple way 4"]
}"#;

pub const ECOMMERCE_SCHEMA: &str = r#"[
  {
    "name": "Product Name 1",
    "niche": "Micro-Niche 1",
    "supplierPriceRange": "Price Range 1",
    "competitorPriceRange": "Price Range 1",
    "adSpend": "Ad Spend Range 1",
    "profitMargin": "Profit Margin 1",
    "totalProfitMargin": "Total Profit Margin 1",
    "topSupplier1": { "name": "Supplier Name 1", "url": "Supplier URL 1" },
    "topSupplier2": { "name": "Supplier Name 2", "url": "Supplier URL 2" },
    "topSupplier3": { "name": "Supplier Name 3", "url": "Supplier URL 3" },
    "features": "Features Description 1"
  }
]"#;

const NONE_SELECTED: &str = "None selected";
const WORK_DAYS_PER_WEEK: u32 = 5;

pub fn time_audit_prompt(submission: &AuditSubmission) -> String {
    let mut lines = vec![
        "You are a productivity coach. Analyse this time audit and write a personalised improvement report."
            .to_string(),
        String::new(),
        format!("Daily activities: {}", joined(&submission.daily_activities)),
        format!("Time wasters: {}", joined(&submission.time_wasters)),
    ];
    push_other(&mut lines, "Other time wasters", &submission.other_time_wasters);
    lines.push(format!("Personal habits: {}", joined(&submission.personal_habits)));
    push_other(&mut lines, "Other habits", &submission.other_habits);
    lines.push(format!("Dependencies on others: {}", joined(&submission.dependencies)));
    push_other(&mut lines, "Other dependencies", &submission.other_dependencies);
    lines.push(format!("Planning issues: {}", joined(&submission.planning_issues)));
    push_other(&mut lines, "Other planning issues", &submission.other_planning_issues);
    lines.push(format!(
        "Environmental factors: {}",
        joined(&submission.environmental_factors)
    ));
    push_other(
        &mut lines,
        "Other environmental factors",
        &submission.other_environmental_factors,
    );

    if !submission.time_lost.is_empty() {
        let per_activity = submission
            .time_lost
            .iter()
            .map(|(activity, bucket)| format!("{activity} ({bucket})"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Time lost per day by activity: {per_activity}"));
    }
    let daily = submission.estimated_daily_minutes_lost();
    if daily > 0 {
        lines.push(format!(
            "Estimated time lost: about {} per day, {} per 5-day week",
            hours_minutes(daily),
            hours_minutes(weekly_minutes(daily))
        ));
    }

    lines.push(match submission.habit_control {
        Some(pct) => format!("Feels in control of their habits: {pct}%"),
        None => "Feels in control of their habits: not stated".to_string(),
    });
    lines.push(format!(
        "Work hours: {}",
        submission.work_hours.as_deref().unwrap_or("not stated")
    ));
    lines.push(format!("Top priorities to fix: {}", joined(submission.priorities())));

    lines.push(
        "\nBased on these answers, produce:\n\
- exactly 3 action steps for this week, each with a title and a description, addressing the top priorities first\n\
- 5 solutions that have worked for people with a similar profile\n\
- 4 quick wins they can apply today\n\
- 4 simple ways to improve their environment\n\n\
Respond with ONLY a JSON object in exactly this format, no markdown and no explanation:"
            .to_string(),
    );
    lines.push(TIME_AUDIT_SCHEMA.to_string());
    lines.push(String::new());
    lines.join("\n")
}

pub fn ecommerce_prompt(request: &EcommerceRequest) -> String {
    let lines = [
        format!("User Selected Industries: {}", joined(&request.industries)),
        format!("User Selected Niches: {}", joined(&request.niches)),
        format!("User Preferred Market: {}", request.market.display_name()),
        "\nBased on the user's selected industries, niches, and preferred market, generate three distinct \
high-ticket e-commerce business ideas. Each idea should include:\n\
- Product Name: a creative and compelling name for the product\n\
- Micro-Niche: a specific, affluent target audience\n\
- Supplier price range (USD) for sourcing the product\n\
- Suggested selling price range (USD) in the selected market, considering competitor pricing\n\
- Typical ad spend (USD) to get one sale\n\
- Profit margin per unit before ad spend, and after ad spend (USD)\n\
- Three supplier recommendations from Alibaba, GlobalSources or Made-in-China.com, with supplier names and direct product URLs\n\
- Key product features and unique selling points\n\n\
Return ONLY a JSON array of exactly 3 objects in this format, no introduction or explanation:"
            .to_string(),
        ECOMMERCE_SCHEMA.to_string(),
        String::new(),
    ];
    lines.join("\n")
}

fn joined(items: &[String]) -> String {
    if items.is_empty() {
        NONE_SELECTED.to_string()
    } else {
        items.join(", ")
    }
}

fn push_other(lines: &mut Vec<String>, label: &str, value: &Option<String>) {
    if let Some(v) = value {
        lines.push(format!("{label}: {v}"));
    }
}

fn weekly_minutes(daily: u32) -> u32 {
    daily.saturating_mul(WORK_DAYS_PER_WEEK)
}

fn hours_minutes(total_minutes: u32) -> String {
    match (total_minutes / 60, total_minutes % 60) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} min"),
    }
}
