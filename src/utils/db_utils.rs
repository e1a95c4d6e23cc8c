use actix_web::error::ErrorBadRequest;
use serde_json::Value;
use sqlx::MySqlPool;

/// SQL bindable value enum
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Null,
}

/// SQL update container
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Build a dynamic UPDATE statement from a JSON object of changed fields.
/// Column names are taken from the whitelist, never from the payload.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    allowed_columns: &[&str],
    id_column: &str,
    id_value: i64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    if let Some(unknown) = obj.keys().find(|k| !allowed_columns.contains(&k.as_str())) {
        return Err(ErrorBadRequest(format!("Unknown field: {}", unknown)));
    }

    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);

    // Convert JSON values -> SqlValue. Strings bind as strings; none of
    // the whitelisted columns hold dates, so no format sniffing.
    for value in obj.values() {
        match value {
            Value::String(s) => values.push(SqlValue::String(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    values.push(SqlValue::I64(i));
                } else if let Some(f) = n.as_f64() {
                    values.push(SqlValue::F64(f));
                }
            }
            Value::Bool(b) => values.push(SqlValue::Bool(*b)),
            Value::Null => values.push(SqlValue::Null),
            _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
        }
    }

    // WHERE id = ?
    values.push(SqlValue::I64(id_value));

    Ok(SqlUpdate { sql, values })
}

/// Execute the update
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_set_clause_for_whitelisted_fields() {
        let update = build_update_sql(
            "profiles",
            &json!({"department": "Eng"}),
            &["department", "full_name"],
            "id",
            5,
        )
        .unwrap();
        assert_eq!(update.sql, "UPDATE profiles SET department = ? WHERE id = ?");
        assert_eq!(update.values.len(), 2);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = build_update_sql(
            "profiles",
            &json!({"password_hash": "x"}),
            &["department", "full_name"],
            "id",
            5,
        );
        assert!(err.is_err());
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(build_update_sql("profiles", &json!({}), &["department"], "id", 5).is_err());
    }

    #[test]
    fn date_like_strings_stay_strings() {
        let update = build_update_sql(
            "profiles",
            &json!({"full_name": "2024-06-10"}),
            &["full_name"],
            "id",
            1,
        )
        .unwrap();
        assert!(matches!(update.values[0], SqlValue::String(_)));
    }
}
