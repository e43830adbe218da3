use anyhow::Result;
use hashcheck_core::report::RuleDescriptor;

/// Print the rule descriptor.
pub fn rule_info_command(json: bool) -> Result<()> {
    let rule = RuleDescriptor::current();

    if json {
        println!("{}", serde_json::to_string_pretty(&rule)?);
        return Ok(());
    }

    println!("Rule: {} ({})", rule.id, rule.name);
    println!("Options: (none)");
    println!();
    println!("{}", rule.description);

    Ok(())
}
