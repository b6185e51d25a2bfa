//! Utilidades de validación
//!
//! Funciones helper para normalizar y validar los datos que llegan en los
//! formularios de recepción, citas y precios.

use chrono::NaiveDate;
use validator::ValidationError;

/// Normaliza una matrícula: sin espacios a los lados y en mayúsculas
pub fn normalize_plate(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Normaliza un campo opcional: `None` si está vacío tras recortar
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Normaliza un código de moneda (por defecto el indicado)
pub fn normalize_currency(value: Option<&str>, default: &str) -> String {
    non_blank(value)
        .map(|c| c.to_uppercase())
        .unwrap_or_else(|| default.to_string())
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico): entre 7 y 15 dígitos, admite `+`, espacios y guiones
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    let allowed = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();

    if !allowed || !(7..=15).contains(&digits) {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &trimmed.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que el rango de fechas sea coherente cuando ambos extremos existen
pub fn validate_date_window(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => {
            let mut error = ValidationError::new("date_window");
            error.message = Some("valid_from must not be after valid_to".into());
            Err(error)
        }
        _ => Ok(()),
    }
}
