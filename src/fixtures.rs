use crate::models::{Conversation, DirectMessage, Listing, ListingId, ListingKind, Sender};

/// Land listings available for rent
pub fn land_listings() -> Vec<Listing> {
    vec![
        Listing {
            id: 1,
            kind: ListingKind::Land,
            title: "Fertile Land in Mbarara".to_string(),
            price: "UGX 500,000".to_string(),
            location: "Mbarara, Kashari".to_string(),
            image: "https://picsum.photos/seed/land1/400/300".to_string(),
            seller: "John K.".to_string(),
            seller_photo: "https://picsum.photos/seed/seller1/100".to_string(),
            size: Some("2 Acres".to_string()),
            rating: None,
            soil_type: Some("Loam".to_string()),
            land_use: Some("Arable".to_string()),
            water_source: Some(true),
            lat: Some(-0.6050),
            lng: Some(30.6552),
            ai_tips: vec![
                "Intercropping".to_string(),
                "Drought-resistant crops".to_string(),
            ],
        },
        Listing {
            id: 2,
            kind: ListingKind::Land,
            title: "Lakeside Plot".to_string(),
            price: "UGX 1,200,000".to_string(),
            location: "Wakiso, Entebbe".to_string(),
            image: "https://picsum.photos/seed/land2/400/300".to_string(),
            seller: "Peter A.".to_string(),
            seller_photo: "https://picsum.photos/seed/seller3/100".to_string(),
            size: Some("5 Acres".to_string()),
            rating: None,
            soil_type: Some("Sandy".to_string()),
            land_use: Some("Commercial".to_string()),
            water_source: Some(true),
            lat: Some(0.0566),
            lng: Some(32.4627),
            ai_tips: vec!["Organic farming".to_string()],
        },
        Listing {
            id: 3,
            kind: ListingKind::Land,
            title: "Rich Loam Soil".to_string(),
            price: "UGX 800,000".to_string(),
            location: "Mbale, Budadiri".to_string(),
            image: "https://picsum.photos/seed/land3/400/300".to_string(),
            seller: "Mbale Farmers Coop".to_string(),
            seller_photo: "https://picsum.photos/seed/seller6/100".to_string(),
            size: Some("3 Acres".to_string()),
            rating: None,
            soil_type: Some("Loam".to_string()),
            land_use: Some("Arable".to_string()),
            water_source: Some(false),
            lat: Some(1.0821),
            lng: Some(34.1759),
            ai_tips: vec!["Organic farming".to_string(), "Zero tillage".to_string()],
        },
        Listing {
            id: 4,
            kind: ListingKind::Land,
            title: "Gulu Farmland".to_string(),
            price: "UGX 400,000".to_string(),
            location: "Gulu".to_string(),
            image: "https://picsum.photos/seed/land4/400/300".to_string(),
            seller: "David O.".to_string(),
            seller_photo: "https://picsum.photos/seed/seller9/100".to_string(),
            size: Some("10 Acres".to_string()),
            rating: None,
            soil_type: Some("Black Cotton".to_string()),
            land_use: Some("Grazing".to_string()),
            water_source: Some(false),
            lat: Some(2.7725),
            lng: Some(32.2884),
            ai_tips: vec!["Drought-resistant crops".to_string()],
        },
    ]
}

/// Produce, inputs and machinery for sale
pub fn product_listings() -> Vec<Listing> {
    vec![
        product(101, "Organic Maize", "UGX 1,500 / Kg", "Jinja", "Maria N.", 2),
        product(102, "Fresh Matooke", "UGX 20,000 / bunch", "Masaka", "Aisha K.", 4),
        product(103, "NPK Fertilizer", "UGX 150,000 / bag", "Kampala", "Agro Supplies Ltd", 5),
        product(104, "High-Yield Beans Seeds", "UGX 5,000 / Kg", "Mbale", "Mbale Farmers Coop", 6),
        product(105, "Walking Tractor", "UGX 3,500,000", "Arua", "Mechanics Inc.", 7),
        product(106, "Irish Potatoes", "UGX 2,000 / Kg", "Kabale", "Sarah T.", 8),
    ]
}

pub fn all_listings() -> Vec<Listing> {
    let mut all = land_listings();
    all.extend(product_listings());
    all
}

pub fn find_listing(id: ListingId) -> Option<Listing> {
    all_listings().into_iter().find(|listing| listing.id == id)
}

/// Listings whose ids are in `ids`, in catalogue order
pub fn listings_by_ids(ids: &[ListingId]) -> Vec<Listing> {
    all_listings()
        .into_iter()
        .filter(|listing| ids.contains(&listing.id))
        .collect()
}

/// Seeded inbox shown on the Messages tab
pub fn conversations() -> Vec<Conversation> {
    vec![
        Conversation {
            id: 1,
            user_name: "Maria N.".to_string(),
            user_photo: "https://picsum.photos/seed/seller2/100".to_string(),
            last_message: "Yes, the maize is still available. How many bags do you need?"
                .to_string(),
            timestamp: "10:42 AM".to_string(),
            unread_count: Some(2),
            listing_title: "Organic Maize".to_string(),
        },
        Conversation {
            id: 2,
            user_name: "Peter A.".to_string(),
            user_photo: "https://picsum.photos/seed/seller3/100".to_string(),
            last_message: "The plot has direct access to the lake.".to_string(),
            timestamp: "Yesterday".to_string(),
            unread_count: None,
            listing_title: "Lakeside Plot".to_string(),
        },
        Conversation {
            id: 3,
            user_name: "Agro Supplies Ltd".to_string(),
            user_photo: "https://picsum.photos/seed/seller5/100".to_string(),
            last_message: "We deliver country-wide for an extra fee.".to_string(),
            timestamp: "Mon".to_string(),
            unread_count: None,
            listing_title: "NPK Fertilizer".to_string(),
        },
        Conversation {
            id: 4,
            user_name: "David O.".to_string(),
            user_photo: "https://picsum.photos/seed/seller9/100".to_string(),
            last_message: "You can come view the land this weekend.".to_string(),
            timestamp: "Sun".to_string(),
            unread_count: None,
            listing_title: "Gulu Farmland".to_string(),
        },
    ]
}

/// Opening messages of every direct chat
pub fn seeded_thread() -> Vec<DirectMessage> {
    [
        (1, "Hello, is this still available?", "10:40 AM", Sender::Me),
        (
            2,
            "Yes, the maize is still available. How many bags do you need?",
            "10:42 AM",
            Sender::Other,
        ),
        (3, "I need 5 bags. Can you deliver to Kampala?", "10:43 AM", Sender::Me),
    ]
    .into_iter()
    .map(|(id, text, timestamp, sender)| DirectMessage {
        id,
        text: text.to_string(),
        timestamp: timestamp.to_string(),
        sender,
    })
    .collect()
}

fn product(
    id: ListingId,
    title: &str,
    price: &str,
    location: &str,
    seller: &str,
    seller_seed: u32,
) -> Listing {
    Listing {
        id,
        kind: ListingKind::Product,
        title: title.to_string(),
        price: price.to_string(),
        location: location.to_string(),
        image: format!("https://picsum.photos/seed/prod{}/400/300", id - 100),
        seller: seller.to_string(),
        seller_photo: format!("https://picsum.photos/seed/seller{}/100", seller_seed),
        size: None,
        rating: None,
        soil_type: None,
        land_use: None,
        water_source: None,
        lat: None,
        lng: None,
        ai_tips: Vec::new(),
    }
}
