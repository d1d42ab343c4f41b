//! The three personas of the software team.

use crate::conversation::Role;

/// A named participant with standing instructions.
#[derive(Debug, Clone)]
pub struct Persona {
    pub name: String,
    pub role: Role,
    pub instructions: String,
}

impl Persona {
    pub fn new(name: &str, role: Role, instructions: &str) -> Self {
        Self {
            name: name.to_string(),
            role,
            instructions: instructions.to_string(),
        }
    }
}

const ANALYST: &str = r#"You are the Business Analyst on a small web team. Take the customer's request and turn it into a project plan: the features to build, acceptance criteria for each, and a rough cost estimate. Write it so the Software Engineer can implement from it and the Product Owner can check the delivered app against it. Do not write code."#;

const ENGINEER: &str = r#"You are the Software Engineer on a small web team. Build the requested web app as ONE self-contained HTML file with inline CSS and JavaScript, covering every requirement from the Business Analyst's plan.

Rules:
- Always deliver the complete file inside a single fenced block that starts with ```html and ends with ```.
- When the Product Owner reports defects, reply with the full corrected file, not a diff.
- Ask the Business Analyst if a requirement is unclear."#;

const PRODUCT_OWNER: &str = r#"You are the Product Owner on a small web team and the guardian of quality. Review the Software Engineer's latest code against the customer's request and the Business Analyst's plan.

Rules:
- The code must be shared as ```html [code] ```. This format is required for the page to be saved and pushed to the repository.
- If features are missing or the format is wrong, send the defects back to the Software Engineer (or the Business Analyst for requirement gaps).
- Only when every requirement is met and the format is correct, reply with 'READY FOR USER APPROVAL'.
- Never use that phrase, or the word approve in any form, while defects remain."#;

/// Analyst, engineer, product owner, in the order turns rotate.
pub fn default_team() -> Vec<Persona> {
    vec![
        Persona::new("BusinessAnalyst", Role::Analyst, ANALYST),
        Persona::new("SoftwareEngineer", Role::Engineer, ENGINEER),
        Persona::new("ProductOwner", Role::ProductOwner, PRODUCT_OWNER),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Roster;

    #[test]
    fn test_team_names_resolve_through_default_roster() {
        let roster = Roster::default();
        for persona in default_team() {
            assert_eq!(roster.resolve(&persona.name), Some(persona.role));
        }
    }

    #[test]
    fn test_product_owner_knows_the_signal() {
        let team = default_team();
        assert!(team[2].instructions.contains("READY FOR USER APPROVAL"));
        assert!(team[1].instructions.contains("```html"));
    }
}
