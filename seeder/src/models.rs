/// One category page of the directory and the dataset file feeding it.
pub struct CategoryConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub data_file: &'static str,
    pub icon: &'static str,
}

pub const CATEGORY_CONFIGS: &[CategoryConfig] = &[
    CategoryConfig {
        id: "party-vibe",
        name: "Party Vibe",
        title: "Party Vibe Restaurants & Bars - Lively Dining & Nightlife",
        description: "Restaurants and bars with lively atmospheres: rooftop bars, live music venues, sports bars, and trendy spots for groups and celebrations.",
        data_file: "party-vibe.json",
        icon: "🎉",
    },
    CategoryConfig {
        id: "fine-dining",
        name: "Fine Dining",
        title: "Fine Dining Restaurants - Upscale Dining & Special Occasions",
        description: "Fine dining for special occasions, from waterfront rooms to chef-driven tasting menus and premium steakhouses.",
        data_file: "fine-dining.json",
        icon: "✨",
    },
    CategoryConfig {
        id: "food-services",
        name: "Food Services",
        title: "Food Services - Meal Prep, Delivery & Personal Chefs",
        description: "Meal prep services, food delivery, and personal chefs, from fitness-focused plans to private dining.",
        data_file: "food-services.json",
        icon: "🥗",
    },
    CategoryConfig {
        id: "med-spas",
        name: "Med Spas",
        title: "Med Spas - Aesthetic Treatments & Wellness",
        description: "Med spas and wellness centers, from aesthetic treatments to advanced wellness services.",
        data_file: "med-spas.json",
        icon: "💆",
    },
    CategoryConfig {
        id: "golf-courses",
        name: "Golf Courses",
        title: "Golf Courses & Country Clubs",
        description: "Championship courses to beginner-friendly layouts.",
        data_file: "golf.json",
        icon: "⛳",
    },
    CategoryConfig {
        id: "movie-theaters",
        name: "Movie Theaters",
        title: "Movie Theaters - Cinema Entertainment & IMAX",
        description: "Luxury theaters with reclining seats, IMAX screens, and independent film venues.",
        data_file: "movie-theaters.json",
        icon: "🎬",
    },
    CategoryConfig {
        id: "family-activities",
        name: "Family Activities",
        title: "Family Activities - Kid-Friendly Attractions & Entertainment",
        description: "Family-friendly attractions, from aquariums and animal parks to adventure courses and museums.",
        data_file: "family-activities.json",
        icon: "🎠",
    },
    CategoryConfig {
        id: "beaches",
        name: "Beaches",
        title: "Beaches - Access, Amenities & Activities",
        description: "Beach access points, amenities, activities, and quieter stretches along the coast.",
        data_file: "beaches.json",
        icon: "🏖",
    },
    CategoryConfig {
        id: "meet-people",
        name: "Meet People",
        title: "Meet People - Social Activities & Networking",
        description: "Solo-friendly venues, sports leagues, networking events, art classes, and community activities.",
        data_file: "meet-people.json",
        icon: "🤝",
    },
];
