// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures and sample SQL statements

use sql_fluent_lowering::SqlFragment;

/// Sample SQL statements for testing
pub struct SqlFixtures;

impl SqlFixtures {
    // ===== SELECT statements =====

    /// SELECT with a two-condition WHERE chain
    pub const fn select_with_where() -> &'static str {
        "SELECT * FROM users WHERE age > ? AND name = ?"
    }

    /// SELECT with an INNER JOIN and aliases
    pub const fn select_with_join() -> &'static str {
        "SELECT p.* FROM posts p INNER JOIN users u ON p.user_id = u.id WHERE p.published = ?"
    }

    /// SELECT using every supported clause
    pub const fn select_all_clauses() -> &'static str {
        "SELECT DISTINCT u.id, COUNT(o.id) AS orders
         FROM users u
         LEFT JOIN orders o ON o.user_id = u.id AND o.status = ?
         WHERE u.created_at > ? AND (u.role = ? OR u.role = ?)
         GROUP BY u.id
         HAVING COUNT(o.id) > ?
         ORDER BY orders DESC, u.id
         LIMIT ? OFFSET ?"
    }

    /// SELECT with OR/AND mixing that needs precedence folding
    pub const fn select_mixed_precedence() -> &'static str {
        "SELECT * FROM t WHERE a = ? OR b = ? AND c = ?"
    }

    // ===== INSERT statements =====

    /// INSERT with an explicit column list
    pub const fn insert_with_columns() -> &'static str {
        "INSERT INTO users (name, age) VALUES (?, ?)"
    }

    /// INSERT without a column list
    pub const fn insert_positional() -> &'static str {
        "INSERT INTO logs VALUES (?, NOW(), ?)"
    }

    /// INSERT ... SET
    pub const fn insert_set() -> &'static str {
        "INSERT INTO users SET name = ?, email = ?"
    }

    /// INSERT ... SELECT
    pub const fn insert_select() -> &'static str {
        "INSERT INTO archive (id, name) SELECT id, name FROM users WHERE deleted = ?"
    }

    // ===== UPDATE / DELETE statements =====

    /// UPDATE with alias, ORDER BY and LIMIT
    pub const fn update_with_limit() -> &'static str {
        "UPDATE users u SET u.name = ?, u.updated_at = NOW() WHERE u.id = ? ORDER BY u.id LIMIT 1"
    }

    /// UPDATE with a join condition placeholder before SET
    pub const fn update_with_join() -> &'static str {
        "UPDATE orders o INNER JOIN users u ON u.id = o.user_id AND u.tier = ? SET o.discount = ? WHERE o.status = ?"
    }

    /// Single-table DELETE
    pub const fn delete_simple() -> &'static str {
        "DELETE FROM sessions WHERE expires_at < ?"
    }

    /// MySQL join-form DELETE
    pub const fn delete_with_join() -> &'static str {
        "DELETE p FROM posts p LEFT JOIN users u ON u.id = p.user_id WHERE u.id IS NULL"
    }

    // ===== Declined statements =====

    /// Statements every converter must decline
    pub fn declined() -> Vec<&'static str> {
        vec![
            "SELECT a FROM t UNION SELECT a FROM u",
            "WITH x AS (SELECT 1) SELECT * FROM x",
            "SELECT * FROM (SELECT id FROM t) d",
            "REPLACE INTO t (a) VALUES (?)",
            "SELECT * FROM t WHERE a = 'unterminated",
            "INSERT INTO t (a) VALUES (?), (?)",
        ]
    }

    // ===== Fragments =====

    /// Concatenation of literals only
    pub fn literal_concat() -> SqlFragment {
        SqlFragment::concat([
            SqlFragment::literal("SELECT id FROM users "),
            SqlFragment::literal("WHERE email = ?"),
        ])
    }

    /// Concatenation containing a runtime expression
    pub fn dynamic_concat() -> SqlFragment {
        SqlFragment::concat([
            SqlFragment::literal("SELECT * FROM "),
            SqlFragment::dynamic("$table"),
            SqlFragment::literal(" WHERE id = ?"),
        ])
    }
}
