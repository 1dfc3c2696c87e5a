//! `dsatutor tool`: Run a built-in DSA lookup tool.

use dsatutor_core::tool::ToolCall;

pub async fn run(name: &str, args: &str) -> Result<(), Box<dyn std::error::Error>> {
    let arguments: serde_json::Value =
        serde_json::from_str(args).map_err(|e| format!("Arguments must be a JSON object: {e}"))?;

    let registry = dsatutor_tools::default_registry();
    if registry.get(name).is_none() {
        return Err(format!(
            "Unknown tool '{name}'. Available: {}",
            registry.names().join(", ")
        )
        .into());
    }

    let call = ToolCall {
        name: name.to_string(),
        arguments,
    };
    let result = registry.execute(&call).await?;
    println!("{}", result.output);

    Ok(())
}
