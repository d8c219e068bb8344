use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Retail,
    Wholesale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// A customer either ships to their billing address or to a separate one.
/// Resolving to a single effective address happens at the point of use, so
/// the rest of the code never juggles half-filled optional fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingAddress {
    SameAsBilling,
    Separate(Address),
}

/// Read-only input to the shipping dispatcher; customer records are owned by
/// the storefront's account subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub company_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gstin: Option<String>,
    pub customer_type: CustomerType,
    pub billing_address: Address,
    pub shipping_address: ShippingAddress,
}

impl Customer {
    pub fn ships_to_billing(&self) -> bool {
        matches!(self.shipping_address, ShippingAddress::SameAsBilling)
    }

    /// The address parcels actually go to.
    pub fn effective_shipping_address(&self) -> &Address {
        match &self.shipping_address {
            ShippingAddress::SameAsBilling => &self.billing_address,
            ShippingAddress::Separate(address) => address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn billing() -> Address {
        Address {
            line1: "12 MG Road".to_string(),
            line2: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            country: "India".to_string(),
        }
    }

    fn customer(shipping: ShippingAddress) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            company_name: "Acme Prints".to_string(),
            email: "ops@acme.example".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            phone: "+919800000000".to_string(),
            gstin: None,
            customer_type: CustomerType::Retail,
            billing_address: billing(),
            shipping_address: shipping,
        }
    }

    #[test]
    fn same_as_billing_resolves_to_billing_address() {
        let customer = customer(ShippingAddress::SameAsBilling);
        assert!(customer.ships_to_billing());
        assert_eq!(customer.effective_shipping_address(), &customer.billing_address);
    }

    #[test]
    fn separate_address_resolves_to_itself() {
        let warehouse = Address {
            line1: "Plot 4, Industrial Area".to_string(),
            line2: Some("Phase II".to_string()),
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            postal_code: "411001".to_string(),
            country: "India".to_string(),
        };
        let customer = customer(ShippingAddress::Separate(warehouse.clone()));
        assert!(!customer.ships_to_billing());
        assert_eq!(customer.effective_shipping_address(), &warehouse);
    }
}
