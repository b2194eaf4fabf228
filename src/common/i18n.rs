// src/common/i18n.rs

// Catálogo de mensagens. Idiomas suportados: en (padrão), es, pt.
// Chaves desconhecidas voltam como estão, para não esconder o problema.

pub const SUPPORTED_LANGUAGES: [&str; 3] = ["en", "es", "pt"];

pub fn translate<'a>(lang: &str, key: &'a str) -> &'a str {
    let message: Option<&'a str> = match lang {
        "es" => spanish(key),
        "pt" => portuguese(key),
        _ => None,
    };

    message.or_else(|| english(key)).unwrap_or(key)
}

fn english(key: &str) -> Option<&'static str> {
    Some(match key {
        "error.validation" => "One or more fields are invalid.",
        "error.email_already_exists" => "This e-mail is already in use.",
        "error.invalid_credentials" => "Invalid e-mail or password.",
        "error.invalid_token" => "Missing or invalid authentication token.",
        "error.user_not_found" => "User not found.",
        "error.owner_role_required" => "Only the business owner can perform this action.",
        "error.product_not_found" => "Product not found",
        "error.product_name_already_exists" => "A product with this name already exists.",
        "error.insufficient_stock" => "Insufficient stock",
        "error.invalid_quantity" => "Invalid quantity for adjustment",
        "error.stock_out_of_range" => "Stock value out of supported range",
        "error.movement_not_found" => "Movement not found",
        "error.transaction_not_found" => "Transaction not found",
        "error.internal" => "An unexpected error occurred.",
        // Mensagens de validação
        "required" => "This field is required.",
        "invalid_email" => "The e-mail provided is invalid.",
        "password_too_short" => "Password must be at least 6 characters long.",
        "not_negative" => "Value cannot be negative.",
        "must_be_positive" => "Value must be greater than zero.",
        _ => return None,
    })
}

fn spanish(key: &str) -> Option<&'static str> {
    Some(match key {
        "error.validation" => "Uno o más campos son inválidos.",
        "error.email_already_exists" => "El usuario ya existe",
        "error.invalid_credentials" => "Credenciales inválidas",
        "error.invalid_token" => "Token inválido o ausente",
        "error.user_not_found" => "Usuario no encontrado",
        "error.owner_role_required" => "No autorizado",
        "error.product_not_found" => "Producto no encontrado",
        "error.product_name_already_exists" => "Ya existe un producto con ese nombre",
        "error.insufficient_stock" => "Stock insuficiente",
        "error.invalid_quantity" => "Cantidad inválida para ajuste",
        "error.stock_out_of_range" => "Valor de stock fuera de rango",
        "error.movement_not_found" => "Movimiento no encontrado",
        "error.transaction_not_found" => "Transacción no encontrada",
        "error.internal" => "Error del servidor",
        "required" => "Este campo es requerido.",
        "invalid_email" => "Email inválido",
        "password_too_short" => "La contraseña debe tener al menos 6 caracteres",
        "not_negative" => "El valor no puede ser negativo.",
        "must_be_positive" => "El valor debe ser mayor que cero.",
        _ => return None,
    })
}

fn portuguese(key: &str) -> Option<&'static str> {
    Some(match key {
        "error.validation" => "Um ou mais campos são inválidos.",
        "error.email_already_exists" => "Este e-mail já está em uso.",
        "error.invalid_credentials" => "E-mail ou senha inválidos.",
        "error.invalid_token" => "Token de autenticação inválido ou ausente.",
        "error.user_not_found" => "Usuário não encontrado.",
        "error.owner_role_required" => "Apenas o dono da empresa pode realizar esta ação.",
        "error.product_not_found" => "Produto não encontrado",
        "error.product_name_already_exists" => "Já existe um produto com este nome.",
        "error.insufficient_stock" => "Estoque insuficiente",
        "error.invalid_quantity" => "Quantidade inválida para ajuste",
        "error.stock_out_of_range" => "Valor de estoque fora do intervalo suportado",
        "error.movement_not_found" => "Movimentação não encontrada",
        "error.transaction_not_found" => "Transação não encontrada",
        "error.internal" => "Ocorreu um erro inesperado.",
        "required" => "Este campo é obrigatório.",
        "invalid_email" => "O e-mail fornecido é inválido.",
        "password_too_short" => "A senha deve ter no mínimo 6 caracteres.",
        "not_negative" => "O valor não pode ser negativo.",
        "must_be_positive" => "O valor deve ser maior que zero.",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(translate("de", "error.product_not_found"), "Product not found");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        assert_eq!(translate("es", "length"), "length");
    }
}
