//! Role classification through the tenant role taxonomy.
//!
//! Free-text role names are mapped to a [`RoleTag`] by the first taxonomy
//! keyword they contain, compared case-insensitively. The opener and closer
//! predicates test every keyword for their tag, so a combined role such as
//! "Open/Close Lead" counts toward both rules.

use crate::config::RoleTaxonomy;
use crate::models::RoleTag;

/// Classifies a role name.
///
/// # Example
///
/// ```
/// use scheduling_engine::calculation::classify_role;
/// use scheduling_engine::config::RoleTaxonomy;
/// use scheduling_engine::models::RoleTag;
///
/// let taxonomy = RoleTaxonomy::default();
/// assert_eq!(classify_role("Opener Lead", &taxonomy), RoleTag::Opener);
/// assert_eq!(classify_role("CLOSER SCOOPER", &taxonomy), RoleTag::Closer);
/// assert_eq!(classify_role("Manager", &taxonomy), RoleTag::Other);
/// ```
pub fn classify_role(role: &str, taxonomy: &RoleTaxonomy) -> RoleTag {
    let name = role.to_lowercase();
    taxonomy
        .rules
        .iter()
        .find(|rule| keyword_matches(&name, &rule.keyword))
        .map_or(RoleTag::Other, |rule| rule.tag)
}

fn keyword_matches(name: &str, keyword: &str) -> bool {
    let keyword = keyword.trim().to_lowercase();
    !keyword.is_empty() && name.contains(&keyword)
}

/// Whether any taxonomy keyword tagged `tag` appears in the role name.
fn has_role_tag(role: &str, tag: RoleTag, taxonomy: &RoleTaxonomy) -> bool {
    let name = role.to_lowercase();
    taxonomy
        .rules
        .iter()
        .any(|rule| rule.tag == tag && keyword_matches(&name, &rule.keyword))
}

/// Whether the role counts toward the minimum-opener rule.
pub fn is_opener_role(role: &str, taxonomy: &RoleTaxonomy) -> bool {
    has_role_tag(role, RoleTag::Opener, taxonomy)
}

/// Whether the role counts toward the minimum-closer rule.
pub fn is_closer_role(role: &str, taxonomy: &RoleTaxonomy) -> bool {
    has_role_tag(role, RoleTag::Closer, taxonomy)
}

/// Whether staffing recommendations may add or trim this role.
pub fn is_adjustable_role(role: &str, taxonomy: &RoleTaxonomy) -> bool {
    !is_opener_role(role, taxonomy) && !is_closer_role(role, taxonomy)
}
