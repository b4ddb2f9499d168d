use std::collections::HashMap;

use lazy_static::lazy_static;

pub const DEFAULT_LOCALE: &str = "en";

lazy_static! {
    static ref CATALOG: HashMap<&'static str, HashMap<&'static str, &'static str>> = {
        let en: HashMap<_, _> = [
            ("message.created_successfully", "Record created successfully."),
            ("message.updated_successfully", "Record updated successfully."),
            ("message.deleted_successfully", "Record deleted successfully."),
            ("message.logged_in", "Welcome back, {{ name }}."),
            ("message.logged_out", "You have been logged out."),
            ("validation.not_blank", "This value should not be blank."),
            (
                "validation.too_short",
                "This value is too short. It should have {{ limit }} characters or more.",
            ),
            (
                "validation.too_long",
                "This value is too long. It should have {{ limit }} characters or less.",
            ),
            ("validation.email", "This value is not a valid email address."),
            (
                "validation.stale",
                "This form is out of date. Reload the record and try again.",
            ),
            ("validation.csrf", "The CSRF token is invalid. Please try to resubmit the form."),
            ("validation.invalid_credentials", "Invalid credentials."),
            ("title.session_list", "Sessions"),
            ("title.session_view", "Session details"),
            ("title.session_new", "New session"),
            ("title.session_edit", "Edit session"),
            ("title.session_delete", "Delete session"),
            ("title.login", "Log in"),
            ("label.title", "Title"),
            ("label.description", "Description"),
            ("label.created_at", "Created at"),
            ("label.updated_at", "Updated at"),
            ("label.email", "E-mail"),
            ("label.password", "Password"),
            ("action.save", "Save"),
            ("action.create", "Create new"),
            ("action.edit", "Edit"),
            ("action.delete", "Delete"),
            ("action.view", "View"),
            ("action.back", "Back to list"),
            ("action.login", "Log in"),
            ("action.logout", "Log out"),
            ("action.previous", "Previous"),
            ("action.next", "Next"),
            ("message.empty_list", "No records found."),
            ("message.delete_confirm", "Do you really want to delete this record?"),
            ("message.page", "Page {{ page }} of {{ pages }}"),
        ]
        .into_iter()
        .collect();

        let pl: HashMap<_, _> = [
            ("message.created_successfully", "Rekord został utworzony."),
            ("message.updated_successfully", "Rekord został zaktualizowany."),
            ("message.deleted_successfully", "Rekord został usunięty."),
            ("message.logged_in", "Witaj ponownie, {{ name }}."),
            ("message.logged_out", "Wylogowano."),
            ("validation.not_blank", "Ta wartość nie powinna być pusta."),
            (
                "validation.too_short",
                "Ta wartość jest zbyt krótka. Powinna mieć {{ limit }} lub więcej znaków.",
            ),
            (
                "validation.too_long",
                "Ta wartość jest zbyt długa. Powinna mieć {{ limit }} lub mniej znaków.",
            ),
            ("validation.email", "Ta wartość nie jest prawidłowym adresem email."),
            (
                "validation.stale",
                "Formularz jest nieaktualny. Odśwież rekord i spróbuj ponownie.",
            ),
            ("validation.csrf", "Nieprawidłowy token CSRF. Spróbuj ponownie wysłać formularz."),
            ("validation.invalid_credentials", "Nieprawidłowe dane logowania."),
            ("title.session_list", "Sesje"),
            ("title.session_view", "Szczegóły sesji"),
            ("title.session_new", "Nowa sesja"),
            ("title.session_edit", "Edycja sesji"),
            ("title.session_delete", "Usuwanie sesji"),
            ("title.login", "Logowanie"),
            ("label.title", "Tytuł"),
            ("label.description", "Opis"),
            ("label.created_at", "Utworzono"),
            ("label.updated_at", "Zaktualizowano"),
            ("label.email", "E-mail"),
            ("label.password", "Hasło"),
            ("action.save", "Zapisz"),
            ("action.create", "Utwórz nowy"),
            ("action.edit", "Edytuj"),
            ("action.delete", "Usuń"),
            ("action.view", "Pokaż"),
            ("action.back", "Powrót do listy"),
            ("action.login", "Zaloguj"),
            ("action.logout", "Wyloguj"),
            ("action.previous", "Poprzednia"),
            ("action.next", "Następna"),
            ("message.empty_list", "Brak rekordów."),
            ("message.delete_confirm", "Czy na pewno chcesz usunąć ten rekord?"),
            ("message.page", "Strona {{ page }} z {{ pages }}"),
        ]
        .into_iter()
        .collect();

        [("en", en), ("pl", pl)].into_iter().collect()
    };
}

/// Resolves message keys for one locale.
///
/// Lookup falls back to [`DEFAULT_LOCALE`] and finally to the key itself, so a
/// missing translation never breaks a page.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: &'static str,
}

impl Translator {
    pub fn new(locale: &str) -> Self {
        let locale = CATALOG
            .get_key_value(locale)
            .map(|(k, _)| *k)
            .unwrap_or(DEFAULT_LOCALE);
        Self { locale }
    }

    pub fn locale(&self) -> &'static str {
        self.locale
    }

    pub fn t(&self, key: &str) -> String {
        self.lookup(key).to_string()
    }

    /// Translates `key` and substitutes `{{ name }}` placeholders.
    pub fn t_with(&self, key: &str, params: &[(&str, String)]) -> String {
        let mut text = self.lookup(key).to_string();
        for (name, value) in params {
            text = text.replace(&format!("{{{{ {name} }}}}"), value);
        }
        text
    }

    fn lookup<'a>(&self, key: &'a str) -> &'a str {
        CATALOG
            .get(self.locale)
            .and_then(|m| m.get(key))
            .or_else(|| CATALOG.get(DEFAULT_LOCALE).and_then(|m| m.get(key)))
            .copied()
            .unwrap_or(key)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}
