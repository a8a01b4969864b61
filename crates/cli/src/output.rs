// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Rendering of conversion results

use serde_json::{Value, json};
use sql_fluent_ir::BuilderOp;
use sql_fluent_lowering::{Conversion, EmissionMode, LoweringResult};

/// One converted statement together with its source text
pub struct Report<'a> {
    pub index: usize,
    pub sql: &'a str,
    pub result: &'a LoweringResult<Conversion>,
}

/// Builder chain in the target syntax, one call per line
pub fn render_chain(mode: EmissionMode, ops: &[BuilderOp]) -> String {
    let mut out = String::from(mode.builder_root());
    for op in ops {
        out.push_str("\n    ->");
        out.push_str(&op.to_string());
    }
    out.push(';');
    out
}

pub fn render_text(mode: EmissionMode, report: &Report<'_>) -> String {
    let mut out = format!("-- [{}] {}\n", report.index, report.sql);
    match report.result {
        Ok(conversion) => {
            let status = if conversion.is_partial() { "partial" } else { "converted" };
            out.push_str(&format!(
                "-- {} {}, {} parameter(s)\n",
                status, conversion.kind, conversion.param_count
            ));
            for warning in conversion.warnings() {
                out.push_str(&format!("-- warning: {}\n", warning));
            }
            out.push_str(&render_chain(mode, &conversion.ops));
            out.push('\n');
        }
        Err(err) => {
            out.push_str(&format!("-- declined: {}\n", err));
        }
    }
    out
}

pub fn render_json(report: &Report<'_>) -> Value {
    match report.result {
        Ok(conversion) => {
            let status = if conversion.is_partial() { "partial" } else { "converted" };
            json!({
                "index": report.index,
                "sql": report.sql,
                "status": status,
                "conversion": conversion,
                "ops": conversion.ops.iter().map(ToString::to_string).collect::<Vec<_>>(),
            })
        }
        Err(err) => json!({
            "index": report.index,
            "sql": report.sql,
            "status": "declined",
            "error": err,
            "message": err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sql_fluent_lowering::Converter;

    #[test]
    fn test_render_chain() {
        let conversion = Converter::default()
            .convert_sql("DELETE FROM t WHERE id = ?")
            .unwrap();
        assert_eq!(
            render_chain(EmissionMode::Connection, &conversion.ops),
            "$connection->createQueryBuilder()\n    ->delete(\"t\")\n    ->where(\"id = :param1\");"
        );
        assert!(
            render_chain(EmissionMode::EntityManager, &[])
                .starts_with("$entityManager->getConnection()")
        );
    }

    #[test]
    fn test_render_text_declined() {
        let sql = "TRUNCATE t";
        let result = Converter::default().convert_sql(sql);
        let text = render_text(
            EmissionMode::Connection,
            &Report {
                index: 1,
                sql,
                result: &result,
            },
        );
        assert!(text.starts_with("-- [1] TRUNCATE t\n-- declined: "));
    }

    #[test]
    fn test_render_json_partial() {
        let sql = "INSERT INTO t VALUES (?)";
        let result = Converter::default().convert_sql(sql);
        let value = render_json(&Report {
            index: 2,
            sql,
            result: &result,
        });
        assert_eq!(value["status"], "partial");
        assert_eq!(value["ops"][1], "setValue(0, :param1)");
    }
}
