use crate::errors::GenerationError;
use crate::generators::{GenerationContext, at_midnight};
use crate::ids::{PRICEBOOK_ENTRY_PREFIX, PRODUCT_PREFIX, allocate};
use crate::records::{PricebookEntry, Product};
use crate::reference::PRODUCT_CATALOG;

/// Products with their single price book entry, in catalog order.
pub struct ProductCatalog {
    pub products: Vec<Product>,
    pub pricebook_entries: Vec<PricebookEntry>,
}

impl ProductCatalog {
    /// Price book entry for a product; every product has exactly one.
    pub fn entry_for(&self, index: usize) -> Option<(&Product, &PricebookEntry)> {
        Some((self.products.get(index)?, self.pricebook_entries.get(index)?))
    }
}

/// Generate the first `count` catalog products, capped at the catalog size.
pub fn generate_products(
    count: usize,
    ctx: &mut GenerationContext,
) -> Result<ProductCatalog, GenerationError> {
    let count = ctx.cap_to_pool("Product2", count, PRODUCT_CATALOG.len());
    let created_date = at_midnight(ctx.start_date);
    let mut products = Vec::with_capacity(count);
    let mut pricebook_entries = Vec::with_capacity(count);

    for item in &PRODUCT_CATALOG[..count] {
        let product_id = allocate(PRODUCT_PREFIX, &mut ctx.rng);
        products.push(Product {
            id: product_id.clone(),
            name: item.name.to_string(),
            product_code: item.code.to_string(),
            family: item.family,
            description: format!("{} - {} offering", item.name, item.family),
            is_active: true,
            created_date,
        });
        pricebook_entries.push(PricebookEntry {
            id: allocate(PRICEBOOK_ENTRY_PREFIX, &mut ctx.rng),
            product_id,
            unit_price: item.list_price,
            is_active: true,
        });
    }

    Ok(ProductCatalog {
        products,
        pricebook_entries,
    })
}
