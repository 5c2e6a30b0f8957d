//! Thicket CLI
//!
//! Runs a selector against a markup tree described in JSON and prints the matches.
//!
//! - thicket 'div > p' --tree page.json        # List matching elements
//! - thicket 'p:gt(0)' --json '[...]' --count  # Count them
//! - thicket 'a[href^=http]' --ast             # Print the canonical selector

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use thicket_common::warning::warn_once;
use thicket_dom::{DomTree, NodeId, tag::init_registry};
use thicket_select::{CaseSensitivity, Parser as SelectorParser, SelectorConfig, select_with};

/// Longest text excerpt printed per match.
const EXCERPT_CHARS: usize = 60;

/// Thicket: query markup trees with CSS-style selectors
#[derive(Parser, Debug)]
#[command(name = "thicket")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # List the paragraphs directly inside a div
    thicket 'div > p' --tree page.json

    # Inline tree description
    thicket 'p:contains(rain)' --json '{"tag": "p", "children": ["Rain"]}'

    # Query relative to the first .content element
    thicket '> p:lt(2)' --tree page.json --scope .content

    # Compare attribute values case-sensitively
    thicket '[title=Foo]' --tree page.json --case-sensitive-values

    # Show how a selector was understood
    thicket 'div:has(>p),span' --ast
"#)]
struct Cli {
    /// Selector to run
    #[arg(value_name = "SELECTOR")]
    selector: String,

    /// Read the tree description from a JSON file
    #[arg(long, value_name = "FILE", conflicts_with = "json")]
    tree: Option<PathBuf>,

    /// Tree description given inline as JSON
    #[arg(long, value_name = "JSON")]
    json: Option<String>,

    /// Run the query below the first element matching this selector
    #[arg(long, value_name = "SELECTOR")]
    scope: Option<String>,

    /// Parser configuration file (JSON), e.g. {"attribute_values": "sensitive"}
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Compare attribute values case-sensitively unless a selector says otherwise
    #[arg(long)]
    case_sensitive_values: bool,

    /// Print only the number of matches
    #[arg(long)]
    count: bool,

    /// Print the selector in canonical form instead of running it
    #[arg(long)]
    ast: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_registry();

    let parser = SelectorParser::with_config(load_config(&cli)?);
    let list = parser
        .parse(&cli.selector)
        .with_context(|| format!("cannot parse selector `{}`", cli.selector))?;

    if cli.ast {
        println!("{list}");
        return Ok(());
    }

    let tree = load_tree(&cli)?;
    let scope = match &cli.scope {
        Some(text) => {
            let scope_list = parser
                .parse(text)
                .with_context(|| format!("cannot parse scope selector `{text}`"))?;
            select_with(&tree, tree.root(), &scope_list)
                .first()
                .with_context(|| format!("no element matches scope `{text}`"))?
        }
        None => tree.root(),
    };

    let found = select_with(&tree, scope, &list);
    if cli.count {
        println!("{}", found.len());
        return Ok(());
    }
    if found.is_empty() {
        let _ = warn_once("CLI", &format!("no element matches `{list}`"));
    }
    for node in &found {
        print_match(&tree, node);
    }
    Ok(())
}

/// Parser configuration from `--config`, adjusted by flags.
fn load_config(cli: &Cli) -> Result<SelectorConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SelectorConfig::default(),
    };
    if cli.case_sensitive_values {
        config.attribute_values = CaseSensitivity::Sensitive;
    }
    Ok(config)
}

/// Build the tree from `--tree` or `--json`.
fn load_tree(cli: &Cli) -> Result<DomTree> {
    let json = if let Some(ref path) = cli.tree {
        fs::read_to_string(path).with_context(|| format!("cannot read tree {}", path.display()))?
    } else if let Some(ref json) = cli.json {
        json.clone()
    } else {
        bail!("a tree is required: pass --tree FILE or --json TEXT")
    };
    DomTree::from_json(&json).context("cannot build tree")
}

/// Print one match as `tag#id.class  text excerpt`.
fn print_match(tree: &DomTree, node: NodeId) {
    let Some(element) = tree.as_element(node) else {
        return;
    };

    let mut label = element.tag_name.clone();
    if let Some(id) = element.id() {
        label.push('#');
        label.push_str(id);
    }
    for class in element.attr("class").unwrap_or_default().split_ascii_whitespace() {
        label.push('.');
        label.push_str(class);
    }

    let text = tree.text(node);
    let mut excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
    if text.chars().count() > EXCERPT_CHARS {
        excerpt.push('…');
    }
    println!("{} {}", label.cyan().bold(), excerpt.dimmed());
}
