//! Display formatting utilities for CLI output

use colored::*;
use scraper::{Html, Node};

use crate::contact::{ContactEntry, ContactOutcome};
use crate::render::{LabeledValue, ResultsView};

const WRAP_WIDTH: usize = 80;

/// Text content of an HTML fragment, with `br`, `p` and `li` as line breaks
pub fn strip_tags(html: &str) -> String {
  let fragment = Html::parse_fragment(html);
  let mut text = String::with_capacity(html.len());

  for node in fragment.root_element().descendants() {
    match node.value() {
      Node::Text(content) => text.push_str(content),
      Node::Element(element) if matches!(element.name(), "br" | "p" | "li") => text.push('\n'),
      _ => {}
    }
  }

  text
}

/// Wrap text to fit within a specified width
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      continue;
    }

    let mut current_line = String::new();
    for word in paragraph.split_whitespace() {
      if current_line.is_empty() {
        current_line = word.to_string();
      } else if current_line.len() + 1 + word.len() <= width {
        current_line.push(' ');
        current_line.push_str(word);
      } else {
        lines.push(current_line);
        current_line = word.to_string();
      }
    }

    if !current_line.is_empty() {
      lines.push(current_line);
    }
  }

  lines
}

fn heading(title: &str) {
  println!();
  println!("{}", format!("=== {title} ===").blue().bold());
}

fn rows(values: &[LabeledValue]) {
  for row in values {
    println!("  {}: {}", row.label.dimmed(), row.value);
  }
}

fn paragraph(html: &str) {
  for line in wrap_text(&strip_tags(html), WRAP_WIDTH) {
    println!("  {line}");
  }
}

/// Print a populated result as plain text
pub fn print_summary(view: &ResultsView) {
  let status = &view.status;
  let label = if status.status == "Success" { status.status.green() } else { status.status.yellow() };
  println!("{} {} {}", "Analysis".bold(), label, status.company.cyan());
  if !status.industry.is_empty() {
    println!("  {}: {}", "Industry".dimmed(), status.industry);
  }
  if !status.timestamp.is_empty() {
    println!("  {}: {}", "Timestamp".dimmed(), status.timestamp);
  }
  for chip in &status.chips {
    let mark = if chip.present { "✓".green() } else { "·".dimmed() };
    println!("  {mark} {}", chip.label);
  }
  for error in &status.errors {
    println!("  {} {}", "!".red().bold(), error.red());
  }

  if view.has_primary {
    let primary = &view.primary;
    heading("Primary Decision Maker");
    println!("  {} - {}", primary.name.bold(), primary.headline);
    if !primary.profile_link.is_empty() {
      println!("  {}", primary.profile_link.underline());
    }
    if view.primary.has_current_role {
      println!("  Current: {} {}", primary.current_role.title, primary.current_role.subtitle.dimmed());
    }
    for role in &primary.previous_roles {
      println!("  Previous: {} {}", role.title, role.subtitle.dimmed());
    }
    if !primary.education.is_empty() {
      println!("  Education: {}", primary.education);
    }
  }

  if view.has_company {
    let company = &view.company;
    heading("Company Information");
    rows(&company.fields);
    for line in &company.contact {
      println!("  {}: {}", line.kind.dimmed(), line.value);
    }
    rows(&company.legal);
    for director in &company.directors {
      if director.din.is_empty() {
        println!("  Director: {}", director.name);
      } else {
        println!("  Director: {} (DIN: {})", director.name, director.din);
      }
    }
    rows(&company.financial);
  }

  if view.has_market {
    heading("Market Insights");
    paragraph(&view.market.html);
  }

  if view.has_ai {
    heading("AI Analysis");
    if !view.ai.summary.is_empty() {
      paragraph(&view.ai.summary);
    }
    for point in &view.ai.key_points {
      println!("  • {point}");
    }
    for item in &view.ai.recommendations {
      println!("  → {item}");
    }
    paragraph(&view.ai.html);
  }

  if view.has_comparisons {
    heading("Competitor Analysis");
    if view.comparisons.is_empty() {
      println!("  No competitor analysis available");
    }
    for card in &view.comparisons {
      println!("  {}", card.heading.yellow().bold());
      for section in &card.sections {
        println!("    {}", section.title.bold());
        for row in &section.rows {
          println!("      {}: {}", row.label.dimmed(), row.value);
        }
      }
    }
  }

  if view.has_executives {
    heading("Procurement Executives");
    if view.executives.is_empty() {
      println!("  No procurement executives found");
    }
    for executive in &view.executives {
      println!("  {} - {}", executive.name.bold(), executive.headline);
      if !executive.profile_url.is_empty() {
        println!("    {}", executive.profile_url.underline());
      }
    }
  }
}

/// Print one contact lookup
pub fn print_contact(profile_url: &str, entry: &ContactEntry) {
  println!("{} {}", "Contact".bold(), profile_url.cyan());

  match &entry.outcome {
    ContactOutcome::Found { .. } => println!("  {} found", "✓".green()),
    ContactOutcome::NotFound => println!("  {} no contact details found", "·".yellow()),
    ContactOutcome::Error { detail } => println!("  {} lookup failed: {}", "✗".red(), detail),
  }

  if let Some(info) = &entry.contact_info {
    if entry.fallback {
      println!("  {}", "showing sample contact details".yellow());
    }
    for email in &info.email {
      println!("  Email: {email}");
    }
    for phone in &info.phone {
      println!("  Call:  {phone}");
    }
  }
}
