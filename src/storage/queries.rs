//! Database queries for customer records

use rusqlite::{params, Connection, Row};

use crate::error::Result;
use crate::types::{Customer, CustomerId, CustomerInput, CustomerSize, CustomerUpdate};

const CUSTOMER_COLUMNS: &str = "id, name, city, industry, cargo_type, size";

/// Parse a customer from a database row
pub fn customer_from_row(row: &Row) -> rusqlite::Result<Customer> {
    let size_str: String = row.get("size")?;
    Ok(Customer {
        id: row.get("id")?,
        name: row.get("name")?,
        city: row.get("city")?,
        industry: row.get("industry")?,
        cargo_type: row.get("cargo_type")?,
        size: size_str.parse().unwrap_or(CustomerSize::Small),
    })
}

/// Insert a new customer and return it with its assigned id
pub fn create_customer(conn: &Connection, input: &CustomerInput) -> Result<Customer> {
    conn.execute(
        "INSERT INTO customers (name, city, industry, cargo_type, size)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            input.name,
            input.city,
            input.industry,
            input.cargo_type,
            input.size.as_str()
        ],
    )?;

    Ok(Customer {
        id: conn.last_insert_rowid(),
        name: input.name.clone(),
        city: input.city.clone(),
        industry: input.industry.clone(),
        cargo_type: input.cargo_type.clone(),
        size: input.size,
    })
}

/// Look up a customer by id
pub fn get_customer(conn: &Connection, id: CustomerId) -> Result<Option<Customer>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"
    ))?;
    let mut rows = stmt.query_map(params![id], customer_from_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Look up a customer by exact name. If several share the name, the first by
/// id wins.
pub fn get_customer_by_name(conn: &Connection, name: &str) -> Result<Option<Customer>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE name = ?1 ORDER BY id LIMIT 1"
    ))?;
    let mut rows = stmt.query_map(params![name], customer_from_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// List all customers ordered by id
pub fn list_customers(conn: &Connection) -> Result<Vec<Customer>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id"
    ))?;
    let rows = stmt.query_map([], customer_from_row)?;
    let mut customers = Vec::new();
    for row in rows {
        customers.push(row?);
    }
    Ok(customers)
}

/// Apply a partial update; unset fields keep their current value. Returns
/// `None` if the customer does not exist.
pub fn update_customer(
    conn: &Connection,
    id: CustomerId,
    update: &CustomerUpdate,
) -> Result<Option<Customer>> {
    let Some(existing) = get_customer(conn, id)? else {
        return Ok(None);
    };

    let merged = Customer {
        id,
        name: update.name.clone().unwrap_or(existing.name),
        city: update.city.clone().unwrap_or(existing.city),
        industry: update.industry.clone().unwrap_or(existing.industry),
        cargo_type: update.cargo_type.clone().unwrap_or(existing.cargo_type),
        size: update.size.unwrap_or(existing.size),
    };

    conn.execute(
        "UPDATE customers SET name = ?1, city = ?2, industry = ?3, cargo_type = ?4, size = ?5
         WHERE id = ?6",
        params![
            merged.name,
            merged.city,
            merged.industry,
            merged.cargo_type,
            merged.size.as_str(),
            id
        ],
    )?;

    Ok(Some(merged))
}

/// Delete a customer, returning the removed record, or `None` if absent
pub fn delete_customer(conn: &Connection, id: CustomerId) -> Result<Option<Customer>> {
    let Some(existing) = get_customer(conn, id)? else {
        return Ok(None);
    };
    conn.execute("DELETE FROM customers WHERE id = ?1", params![id])?;
    Ok(Some(existing))
}
