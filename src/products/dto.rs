use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiError;

fn default_true() -> bool {
    true
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ProductCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_name(&self.name)?;
        validate_price(self.price)?;
        validate_stock(self.stock)
    }
}

/// Partial update: only fields present in the body are applied.
#[derive(Debug, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub is_active: Option<bool>,
}

impl ProductUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl ListQuery {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.skip < 0 {
            return Err(ApiError::Validation("skip must be >= 0".into()));
        }
        if !(1..=100).contains(&self.limit) {
            return Err(ApiError::Validation(
                "limit must be between 1 and 100".into(),
            ));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    let len = name.chars().count();
    if len == 0 || len > 100 {
        return Err(ApiError::Validation(
            "name must be between 1 and 100 characters".into(),
        ));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> Result<(), ApiError> {
    if price <= Decimal::ZERO {
        return Err(ApiError::Validation("price must be greater than 0".into()));
    }
    Ok(())
}

fn validate_stock(stock: i64) -> Result<(), ApiError> {
    if stock < 0 {
        return Err(ApiError::Validation("stock must be >= 0".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn create(name: &str, price: &str, stock: i64) -> ProductCreate {
        ProductCreate {
            name: name.into(),
            description: None,
            price: dec(price),
            stock,
            is_active: true,
        }
    }

    #[test]
    fn create_accepts_valid_input() {
        assert!(create("Pen", "1.50", 10).validate().is_ok());
    }

    #[test]
    fn create_rejects_non_positive_price() {
        assert!(create("Pen", "0", 10).validate().is_err());
        assert!(create("Pen", "-1.50", 10).validate().is_err());
    }

    #[test]
    fn create_rejects_negative_stock() {
        assert!(create("Pen", "1.50", -1).validate().is_err());
    }

    #[test]
    fn create_rejects_empty_and_oversized_names() {
        assert!(create("", "1.50", 0).validate().is_err());
        assert!(create(&"x".repeat(101), "1.50", 0).validate().is_err());
        assert!(create(&"x".repeat(100), "1.50", 0).validate().is_ok());
    }

    #[test]
    fn create_defaults_stock_and_active() {
        let parsed: ProductCreate = serde_json::from_value(serde_json::json!({
            "name": "Pen",
            "price": 1.50,
        }))
        .unwrap();
        assert_eq!(parsed.stock, 0);
        assert!(parsed.is_active);
        assert_eq!(parsed.price, dec("1.5"));
    }

    #[test]
    fn empty_patch_validates() {
        assert!(ProductUpdate::default().validate().is_ok());
    }

    #[test]
    fn patch_revalidates_present_fields() {
        let patch = ProductUpdate {
            price: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = ProductUpdate {
            stock: Some(-5),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn list_query_defaults_and_bounds() {
        let q: ListQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(q.skip, 0);
        assert_eq!(q.limit, 100);
        assert!(q.validate().is_ok());

        assert!(ListQuery { skip: -1, limit: 10 }.validate().is_err());
        assert!(ListQuery { skip: 0, limit: 0 }.validate().is_err());
        assert!(ListQuery { skip: 0, limit: 101 }.validate().is_err());
        assert!(ListQuery { skip: 0, limit: 1 }.validate().is_ok());
    }
}
