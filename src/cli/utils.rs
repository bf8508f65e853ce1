use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(body), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                body.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an informational block that is neither a success nor an error,
/// such as the restricted-access view.
pub fn output_notice(
    output_format: &OutputFormat,
    title: &str,
    lines: &[&str],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": true,
                    "notice": title,
                    "details": lines,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", title);
            for line in lines {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
