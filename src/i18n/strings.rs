/// Key-based string table for one language.
///
/// Keys are dotted (`listing.no_results_title`). Placeholders use `{name}`
/// and are filled by `format_string`.
#[derive(Debug, Clone, Copy)]
pub struct LanguageStrings {
    entries: &'static [(&'static str, &'static str)],
}

impl LanguageStrings {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Table for a language code. Unknown codes get the English table.
    pub fn for_code(code: &str) -> &'static LanguageStrings {
        match code {
            "de" => &GERMAN_STRINGS,
            "fr" => &FRENCH_STRINGS,
            "es" => &SPANISH_STRINGS,
            "it" => &ITALIAN_STRINGS,
            _ => &ENGLISH_STRINGS,
        }
    }

    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(k, _)| *k)
    }
}

/// Replace `{name}` placeholders. Unknown placeholders are left as-is.
pub fn format_string(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{}}}", name), value)
    })
}

// ==================== English Strings ====================

/// English (canonical). Every key used in the crate must exist here.
pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings::new(&[
    ("listing.search_placeholder", "Search by name, topic or city"),
    ("listing.results_count", "{count} coaches found"),
    ("listing.filters_active", "{count} filters active"),
    ("listing.no_results_title", "No coaches match your filters"),
    ("listing.no_results_body", "Try removing a filter or searching for something else."),
    ("listing.reset_filters", "Reset filters"),
    ("sort.relevance", "Relevance"),
    ("sort.rating", "Best rated"),
    ("sort.price_low", "Price: low to high"),
    ("sort.price_high", "Price: high to low"),
    ("sort.reviews", "Most reviews"),
    ("coach.per_hour", "{price} / hour"),
    ("coach.video_badge", "Intro video"),
    ("coach.free_intro", "Free intro call"),
    ("reviews.count", "{count} reviews"),
    ("reviews.empty", "No reviews yet."),
    ("discovery.success", "Thanks! {coach} will get back to you shortly."),
    ("discovery.name_required", "Please enter your name."),
    ("discovery.phone_required", "Please enter your phone number."),
    ("discovery.time_required", "Please tell us when you are available."),
    ("discovery.email_invalid", "Please enter a valid email address."),
    ("discovery.coach_required", "Please choose a coach."),
    ("error.generic", "Something went wrong. Please try again later."),
    ("quiz.goals", "What do you want to work on?"),
    ("quiz.language", "Which language should your sessions be in?"),
    ("quiz.budget", "What is your budget per session?"),
    ("quiz.format", "Online or in person?"),
    ("quiz.results", "Your best matches"),
    ("seo.title_city", "{specialty} coaching in {city}"),
    ("seo.title", "{specialty} coaching"),
    ("seo.description", "Compare {count} verified {specialty} coaches, read reviews and book a free intro call."),
]);

// ==================== German Strings ====================

pub const GERMAN_STRINGS: LanguageStrings = LanguageStrings::new(&[
    ("listing.search_placeholder", "Nach Name, Thema oder Stadt suchen"),
    ("listing.results_count", "{count} Coaches gefunden"),
    ("listing.filters_active", "{count} Filter aktiv"),
    ("listing.no_results_title", "Keine Coaches passen zu deinen Filtern"),
    ("listing.no_results_body", "Entferne einen Filter oder suche nach etwas anderem."),
    ("listing.reset_filters", "Filter zurücksetzen"),
    ("sort.relevance", "Relevanz"),
    ("sort.rating", "Beste Bewertung"),
    ("sort.price_low", "Preis: aufsteigend"),
    ("sort.price_high", "Preis: absteigend"),
    ("sort.reviews", "Meiste Bewertungen"),
    ("coach.per_hour", "{price} / Stunde"),
    ("coach.video_badge", "Vorstellungsvideo"),
    ("coach.free_intro", "Kostenloses Kennenlernen"),
    ("reviews.count", "{count} Bewertungen"),
    ("reviews.empty", "Noch keine Bewertungen."),
    ("discovery.success", "Danke! {coach} meldet sich in Kürze bei dir."),
    ("discovery.name_required", "Bitte gib deinen Namen ein."),
    ("discovery.phone_required", "Bitte gib deine Telefonnummer ein."),
    ("discovery.time_required", "Bitte sag uns, wann du erreichbar bist."),
    ("discovery.email_invalid", "Bitte gib eine gültige E-Mail-Adresse ein."),
    ("discovery.coach_required", "Bitte wähle einen Coach."),
    ("error.generic", "Etwas ist schiefgelaufen. Bitte versuche es später erneut."),
    ("quiz.goals", "Woran möchtest du arbeiten?"),
    ("quiz.language", "In welcher Sprache sollen die Sitzungen stattfinden?"),
    ("quiz.budget", "Wie hoch ist dein Budget pro Sitzung?"),
    ("quiz.format", "Online oder vor Ort?"),
    ("quiz.results", "Deine besten Treffer"),
    ("seo.title_city", "{specialty} Coaching in {city}"),
    ("seo.title", "{specialty} Coaching"),
    ("seo.description", "Vergleiche {count} geprüfte {specialty} Coaches, lies Bewertungen und buche ein kostenloses Kennenlernen."),
]);

// ==================== French Strings ====================

pub const FRENCH_STRINGS: LanguageStrings = LanguageStrings::new(&[
    ("listing.search_placeholder", "Rechercher par nom, thème ou ville"),
    ("listing.results_count", "{count} coachs trouvés"),
    ("listing.filters_active", "{count} filtres actifs"),
    ("listing.no_results_title", "Aucun coach ne correspond à vos filtres"),
    ("listing.no_results_body", "Retirez un filtre ou essayez une autre recherche."),
    ("listing.reset_filters", "Réinitialiser les filtres"),
    ("sort.relevance", "Pertinence"),
    ("sort.rating", "Mieux notés"),
    ("sort.price_low", "Prix croissant"),
    ("sort.price_high", "Prix décroissant"),
    ("sort.reviews", "Plus d'avis"),
    ("coach.per_hour", "{price} / heure"),
    ("coach.video_badge", "Vidéo de présentation"),
    ("coach.free_intro", "Appel découverte gratuit"),
    ("reviews.count", "{count} avis"),
    ("reviews.empty", "Pas encore d'avis."),
    ("discovery.success", "Merci ! {coach} vous recontactera rapidement."),
    ("discovery.name_required", "Veuillez saisir votre nom."),
    ("discovery.phone_required", "Veuillez saisir votre numéro de téléphone."),
    ("discovery.time_required", "Indiquez-nous vos disponibilités."),
    ("discovery.email_invalid", "Veuillez saisir une adresse e-mail valide."),
    ("discovery.coach_required", "Veuillez choisir un coach."),
    ("error.generic", "Une erreur est survenue. Veuillez réessayer plus tard."),
    ("quiz.goals", "Sur quoi voulez-vous travailler ?"),
    ("quiz.language", "Dans quelle langue souhaitez-vous vos séances ?"),
    ("quiz.budget", "Quel est votre budget par séance ?"),
    ("quiz.format", "En ligne ou en présentiel ?"),
    ("quiz.results", "Vos meilleurs résultats"),
    ("seo.title_city", "Coaching {specialty} à {city}"),
    ("seo.title", "Coaching {specialty}"),
]);

// ==================== Spanish Strings ====================

pub const SPANISH_STRINGS: LanguageStrings = LanguageStrings::new(&[
    ("listing.search_placeholder", "Buscar por nombre, tema o ciudad"),
    ("listing.results_count", "{count} coaches encontrados"),
    ("listing.filters_active", "{count} filtros activos"),
    ("listing.no_results_title", "Ningún coach coincide con tus filtros"),
    ("listing.no_results_body", "Quita un filtro o prueba otra búsqueda."),
    ("listing.reset_filters", "Restablecer filtros"),
    ("sort.relevance", "Relevancia"),
    ("sort.rating", "Mejor valorados"),
    ("sort.price_low", "Precio: de menor a mayor"),
    ("sort.price_high", "Precio: de mayor a menor"),
    ("sort.reviews", "Más reseñas"),
    ("coach.per_hour", "{price} / hora"),
    ("coach.video_badge", "Vídeo de presentación"),
    ("coach.free_intro", "Llamada de introducción gratuita"),
    ("reviews.count", "{count} reseñas"),
    ("reviews.empty", "Todavía no hay reseñas."),
    ("discovery.success", "¡Gracias! {coach} se pondrá en contacto contigo pronto."),
    ("discovery.name_required", "Introduce tu nombre."),
    ("discovery.phone_required", "Introduce tu número de teléfono."),
    ("discovery.time_required", "Indícanos cuándo estás disponible."),
    ("discovery.email_invalid", "Introduce un correo electrónico válido."),
    ("discovery.coach_required", "Elige un coach."),
    ("error.generic", "Algo salió mal. Inténtalo de nuevo más tarde."),
    ("quiz.goals", "¿En qué quieres trabajar?"),
    ("quiz.results", "Tus mejores coincidencias"),
    ("seo.title_city", "Coaching de {specialty} en {city}"),
    ("seo.title", "Coaching de {specialty}"),
]);

// ==================== Italian Strings ====================

pub const ITALIAN_STRINGS: LanguageStrings = LanguageStrings::new(&[
    ("listing.search_placeholder", "Cerca per nome, tema o città"),
    ("listing.results_count", "{count} coach trovati"),
    ("listing.filters_active", "{count} filtri attivi"),
    ("listing.no_results_title", "Nessun coach corrisponde ai tuoi filtri"),
    ("listing.no_results_body", "Rimuovi un filtro o prova un'altra ricerca."),
    ("listing.reset_filters", "Reimposta filtri"),
    ("sort.relevance", "Rilevanza"),
    ("sort.rating", "Più votati"),
    ("sort.price_low", "Prezzo crescente"),
    ("sort.price_high", "Prezzo decrescente"),
    ("sort.reviews", "Più recensioni"),
    ("coach.per_hour", "{price} / ora"),
    ("reviews.count", "{count} recensioni"),
    ("reviews.empty", "Ancora nessuna recensione."),
    ("discovery.name_required", "Inserisci il tuo nome."),
    ("discovery.phone_required", "Inserisci il tuo numero di telefono."),
    ("error.generic", "Qualcosa è andato storto. Riprova più tardi."),
    ("seo.title_city", "Coaching {specialty} a {city}"),
    ("seo.title", "Coaching {specialty}"),
]);
