use crate::actions::{salons, services, staff};
use crate::error::ActionError;
use crate::models::{SalonInput, ServiceInput, StaffInput};
use crate::store::Stores;

/// Fills an empty catalog with a browsable demo data set. Safe to call on
/// every boot; a non-empty catalog is left alone.
pub async fn seed_demo(stores: &Stores) -> Result<(), ActionError> {
    if !salons::list(stores, None).await?.is_empty() {
        return Ok(());
    }

    for input in demo_services() {
        services::add(stores, input).await?;
    }

    let mut salon_ids = Vec::new();
    for input in demo_salons() {
        let salon = salons::add(stores, input).await?;
        salon_ids.push(salon.id);
    }

    for input in demo_staff(&salon_ids) {
        staff::add(stores, input).await?;
    }

    log::info!("Seeded demo catalog");
    Ok(())
}

fn demo_services() -> Vec<ServiceInput> {
    let entries = [
        ("Classic Haircut", "45 min", "$40", "Hair"),
        ("Balayage", "2 hr 30 min", "$180", "Color"),
        ("Hot Towel Shave", "30 min", "$35", "Grooming"),
        ("Gel Manicure", "60 min", "$55", "Nails"),
    ];

    entries
        .into_iter()
        .map(|(name, duration, price, category)| ServiceInput {
            name: Some(name.to_string()),
            duration: Some(duration.to_string()),
            price: Some(price.to_string()),
            category: Some(category.to_string()),
            ..ServiceInput::default()
        })
        .collect()
}

fn demo_salons() -> Vec<SalonInput> {
    vec![
        SalonInput {
            name: Some("Velvet & Vine".to_string()),
            location: Some("18 Orchard Lane, Brookfield".to_string()),
            rating: Some(4.8),
            services: Some(vec![
                "Hair".to_string(),
                "Color".to_string(),
                "Nails".to_string(),
            ]),
            description: Some(
                "A bright, plant-filled studio known for precision cuts and \
                 dimensional colour work."
                    .to_string(),
            ),
            operating_hours: Some(vec![
                "Mon-Fri 9:00-19:00".to_string(),
                "Sat 10:00-16:00".to_string(),
            ]),
            amenities: Some(vec![
                "Walk-ins welcome".to_string(),
                "Free Wi-Fi".to_string(),
            ]),
            ..SalonInput::default()
        },
        SalonInput {
            name: Some("The Gilded Comb".to_string()),
            location: Some("4 Station Road, Easton".to_string()),
            rating: Some(4.6),
            services: Some(vec!["Hair".to_string(), "Grooming".to_string()]),
            description: Some(
                "Traditional barbering with hot towel shaves and a wall of \
                 vintage clippers."
                    .to_string(),
            ),
            operating_hours: Some(vec!["Tue-Sat 8:00-18:00".to_string()]),
            amenities: Some(vec![
                "Card payments".to_string(),
                "Wheelchair accessible".to_string(),
            ]),
            ..SalonInput::default()
        },
    ]
}

fn demo_staff(salon_ids: &[String]) -> Vec<StaffInput> {
    let entries = [
        (
            0,
            "Alice Wonderland",
            "Senior Stylist",
            "alice@example.com",
            vec!["Classic Haircut", "Balayage"],
        ),
        (
            0,
            "Marco Reyes",
            "Colour Specialist",
            "marco@example.com",
            vec!["Balayage"],
        ),
        (
            1,
            "Bob Trimble",
            "Master Barber",
            "bob@example.com",
            vec!["Classic Haircut", "Hot Towel Shave"],
        ),
    ];

    entries
        .into_iter()
        .map(|(salon, name, role, email, provided)| StaffInput {
            salon_id: salon_ids.get(salon).cloned(),
            name: Some(name.to_string()),
            role: Some(role.to_string()),
            email: Some(email.to_string()),
            provided_services: Some(provided.into_iter().map(str::to_string).collect()),
            ..StaffInput::default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[actix_web::test]
    async fn seeds_an_empty_catalog_exactly_once() {
        let stores = Stores::memory();
        seed_demo(&stores).await.unwrap();

        assert_eq!(salons::list(&stores, None).await.unwrap().len(), 2);
        assert_eq!(services::list(&stores).await.unwrap().len(), 4);
        assert_eq!(staff::list(&stores, None).await.unwrap().len(), 3);

        seed_demo(&stores).await.unwrap();
        assert_eq!(salons::list(&stores, None).await.unwrap().len(), 2);
        assert_eq!(services::list(&stores).await.unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn seeded_staff_point_at_seeded_salons() {
        let stores = Stores::memory();
        seed_demo(&stores).await.unwrap();

        let salon_ids: HashSet<String> = salons::list(&stores, None)
            .await
            .unwrap()
            .into_iter()
            .map(|salon| salon.id)
            .collect();

        for member in staff::list(&stores, None).await.unwrap() {
            assert!(salon_ids.contains(&member.salon_id));
            assert!(!member.initials.is_empty());
        }
    }
}
