//! ASCII tree rendering for organization hierarchies.

use crate::models::{OrganizationItem, OrganizationNode};

const LAUNCHABLE: char = '●';
const CONTAINER: char = '○';
const HIDDEN: char = '✗';

fn item_symbol(item: &OrganizationItem) -> char {
    if !item.visible {
        HIDDEN
    } else if item.resource_ref.is_some() {
        LAUNCHABLE
    } else {
        CONTAINER
    }
}

/// Render organizations as ASCII art.
///
/// Example output:
/// ```text
/// Safety Course
/// ├── ○ Module 1
/// │   ├── ● Lesson 1
/// │   └── ● Lesson 2
/// └── ✗ Answer Key
/// ```
pub fn render_tree(organizations: &[OrganizationNode]) -> String {
    let mut output = String::new();
    for org in organizations {
        output.push_str(&org.title);
        output.push('\n');
        for (i, item) in org.items.iter().enumerate() {
            let is_last = i == org.items.len() - 1;
            render_item(&mut output, item, "", is_last);
        }
    }
    output
}

/// Recursion depth is bounded by the parser's item depth limit.
fn render_item(output: &mut String, item: &OrganizationItem, prefix: &str, is_last: bool) {
    let branch = if is_last { "└── " } else { "├── " };
    output.push_str(prefix);
    output.push_str(branch);
    output.push(item_symbol(item));
    output.push(' ');
    output.push_str(&item.title);
    output.push('\n');

    let continuation = if is_last { "    " } else { "│   " };
    let child_prefix = format!("{}{}", prefix, continuation);

    for (i, child) in item.children.iter().enumerate() {
        let child_is_last = i == item.children.len() - 1;
        render_item(output, child, &child_prefix, child_is_last);
    }
}
