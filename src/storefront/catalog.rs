//! Fixed region → city table and store categories.

/// Chilean regions and the cities offered for each.
pub const REGIONS: &[(&str, &[&str])] = &[
    ("Región de Arica y Parinacota", &["Arica", "Putre", "Camarones"]),
    ("Región de Tarapacá", &["Iquique", "Alto Hospicio", "Pozo Almonte", "Pica"]),
    (
        "Región de Antofagasta",
        &["Antofagasta", "Calama", "Tocopilla", "Mejillones", "Taltal"],
    ),
    ("Región de Atacama", &["Copiapó", "Vallenar", "Caldera", "Chañaral"]),
    (
        "Región de Coquimbo",
        &["La Serena", "Coquimbo", "Ovalle", "Illapel", "Vicuña"],
    ),
    (
        "Región de Valparaíso",
        &[
            "Valparaíso",
            "Viña del Mar",
            "Quilpué",
            "Villa Alemana",
            "San Antonio",
            "Quillota",
        ],
    ),
    (
        "Región Metropolitana",
        &[
            "Santiago",
            "Puente Alto",
            "Maipú",
            "La Florida",
            "Las Condes",
            "Providencia",
            "Ñuñoa",
        ],
    ),
    (
        "Región del Libertador General Bernardo O'Higgins",
        &["Rancagua", "San Fernando", "Pichilemu", "Rengo"],
    ),
    (
        "Región del Maule",
        &["Talca", "Curicó", "Linares", "Constitución", "Cauquenes"],
    ),
    ("Región de Ñuble", &["Chillán", "Bulnes", "San Carlos", "Quirihue"]),
    (
        "Región del Biobío",
        &["Concepción", "Talcahuano", "Los Ángeles", "Chiguayante", "Coronel"],
    ),
    (
        "Región de La Araucanía",
        &["Temuco", "Villarrica", "Pucón", "Angol", "Victoria"],
    ),
    (
        "Región de Los Ríos",
        &["Valdivia", "La Unión", "Río Bueno", "Panguipulli"],
    ),
    (
        "Región de Los Lagos",
        &["Puerto Montt", "Osorno", "Castro", "Ancud", "Puerto Varas"],
    ),
    ("Región de Aysén", &["Coyhaique", "Puerto Aysén", "Chile Chico"]),
    (
        "Región de Magallanes",
        &["Punta Arenas", "Puerto Natales", "Porvenir"],
    ),
];

/// Store categories a creator may pick.
pub const CATEGORIES: &[&str] = &["Panadería", "Pastelería", "Empanadas"];

pub fn regions() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|(region, _)| *region)
}

pub fn cities_of(region: &str) -> Option<&'static [&'static str]> {
    REGIONS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, cities)| *cities)
}

pub fn is_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}
