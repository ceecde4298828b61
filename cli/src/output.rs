//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::str::FromStr;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use formbuilder_core::{Field, Form};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

#[derive(Tabled)]
struct FormRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Callback URL")]
    callback: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Form> for FormRow {
    fn from(form: &Form) -> Self {
        Self {
            id: form.id,
            title: form.title.clone(),
            fields: form.fields.len(),
            callback: form.callback_url.clone().unwrap_or_else(|| "-".into()),
            created: form.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    field_type: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Required")]
    required: String,
    #[tabled(rename = "Options")]
    options: String,
}

impl From<&Field> for FieldRow {
    fn from(field: &Field) -> Self {
        Self {
            id: field.id.clone(),
            field_type: field.field_type.to_string(),
            label: field.label.clone(),
            required: if field.required { "yes".into() } else { "no".into() },
            options: field.options.join(", "),
        }
    }
}

impl OutputFormat {
    /// Machine formats for anything serializable.
    pub fn print<T: Serialize>(&self, data: &T) -> anyhow::Result<()> {
        match self {
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(data)?),
            OutputFormat::Json | OutputFormat::Table => println!("{}", serde_json::to_string_pretty(data)?),
        }
        Ok(())
    }

    pub fn print_forms(&self, forms: &[Form]) -> anyhow::Result<()> {
        match self {
            OutputFormat::Table => {
                if forms.is_empty() {
                    println!("{}", "No forms".dimmed());
                } else {
                    println!("{}", forms_table(forms));
                }
                Ok(())
            }
            _ => self.print(&forms),
        }
    }

    pub fn print_form(&self, form: &Form) -> anyhow::Result<()> {
        match self {
            OutputFormat::Table => {
                println!("{} {}", format!("#{}", form.id).bold(), form.title.bold());
                if !form.description.is_empty() {
                    println!("{}", form.description);
                }
                if let Some(url) = &form.callback_url {
                    println!("Callback: {}", url);
                }
                let mut table = Table::new(form.fields.iter().map(FieldRow::from));
                table.with(Style::rounded());
                println!("{}", table);
                Ok(())
            }
            _ => self.print(form),
        }
    }
}

fn forms_table(forms: &[Form]) -> String {
    let mut table = Table::new(forms.iter().map(FormRow::from));
    table.with(Style::rounded());
    table.to_string()
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use formbuilder_core::FieldType;

    fn sample() -> Form {
        let mut form: Form = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Signup",
            "createdAt": "2024-01-02T03:04:05Z"
        }))
        .unwrap();
        form.fields.push(Field::new("email", FieldType::Email, "Email").required());
        form
    }

    #[test]
    fn test_format_from_config_string() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_forms_table_lists_each_form() {
        let rendered = forms_table(&[sample()]);
        assert!(rendered.contains("Signup"));
        assert!(rendered.contains("2024-01-02 03:04"));
        assert!(rendered.contains("Callback URL"));
    }
}
