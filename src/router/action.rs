//! Button action tokens.
//!
//! Every inline button carries a short token such as `cart:inc:iphone_15`. Tokens are parsed
//! once into [`ButtonAction`] and produced from it by `Display`, so the keyboards and the
//! dispatcher can never disagree on the grammar.

use crate::model::{CategoryKey, DeliveryMethod, ProductId};
use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    MenuCatalog,
    MenuHelp,
    BackRoot,
    Category(CategoryKey),
    Product(ProductId),
    CartAdd(ProductId),
    CartView,
    CartInc(ProductId),
    CartDec(ProductId),
    CartClear,
    Checkout,
    CheckoutCancel,
    CheckoutDelivery(DeliveryMethod),
    CheckoutConfirm,
    Noop,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown action token: {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for ButtonAction {
    type Err = UnknownAction;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownAction(token.to_string());
        let action = match token {
            "menu:catalog" => ButtonAction::MenuCatalog,
            "menu:help" => ButtonAction::MenuHelp,
            "back:root" => ButtonAction::BackRoot,
            "cart:view" => ButtonAction::CartView,
            "cart:clear" => ButtonAction::CartClear,
            "checkout" => ButtonAction::Checkout,
            "checkout:cancel" => ButtonAction::CheckoutCancel,
            "checkout:confirm" => ButtonAction::CheckoutConfirm,
            "noop" => ButtonAction::Noop,
            _ => {
                let (prefix, arg) = token.rsplit_once(':').ok_or_else(unknown)?;
                if arg.is_empty() {
                    return Err(unknown());
                }
                match prefix {
                    "cat" => ButtonAction::Category(CategoryKey::from(arg)),
                    "product" => ButtonAction::Product(ProductId::from(arg)),
                    "cart:add" => ButtonAction::CartAdd(ProductId::from(arg)),
                    "cart:inc" => ButtonAction::CartInc(ProductId::from(arg)),
                    "cart:dec" => ButtonAction::CartDec(ProductId::from(arg)),
                    "checkout:delivery" => {
                        ButtonAction::CheckoutDelivery(arg.parse().map_err(|_| unknown())?)
                    }
                    _ => return Err(unknown()),
                }
            }
        };
        Ok(action)
    }
}

impl Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonAction::MenuCatalog => f.write_str("menu:catalog"),
            ButtonAction::MenuHelp => f.write_str("menu:help"),
            ButtonAction::BackRoot => f.write_str("back:root"),
            ButtonAction::Category(key) => write!(f, "cat:{key}"),
            ButtonAction::Product(id) => write!(f, "product:{id}"),
            ButtonAction::CartAdd(id) => write!(f, "cart:add:{id}"),
            ButtonAction::CartView => f.write_str("cart:view"),
            ButtonAction::CartInc(id) => write!(f, "cart:inc:{id}"),
            ButtonAction::CartDec(id) => write!(f, "cart:dec:{id}"),
            ButtonAction::CartClear => f.write_str("cart:clear"),
            ButtonAction::Checkout => f.write_str("checkout"),
            ButtonAction::CheckoutCancel => f.write_str("checkout:cancel"),
            ButtonAction::CheckoutDelivery(method) => {
                write!(f, "checkout:delivery:{}", method.token())
            }
            ButtonAction::CheckoutConfirm => f.write_str("checkout:confirm"),
            ButtonAction::Noop => f.write_str("noop"),
        }
    }
}
