//! # Default Prompt Templates
//!
//! This module contains the prompt templates used by the article synthesizer
//! and the answer engine. Templates use `{placeholder}` markers that the
//! calling module substitutes at build time.

// --- Article Synthesis Prompts ---

/// The system prompt for the article synthesis stage.
///
/// Sets the editorial persona and the terminology rules. The glossary
/// substitution table is rendered into `{glossary}` one `- "banned" -> "preferred"`
/// line per term.
///
/// Placeholders: `{glossary}`
pub const SYNTHESIS_SYSTEM_PROMPT: &str = "Sei un redattore senior di una testata tecnologica italiana specializzata in intelligenza artificiale. \
Scrivi in un italiano professionale, chiaro e privo di sensazionalismi, e produci anche la versione inglese di ogni campo. \
Rispetta SEMPRE questo glossario terminologico: non usare mai il termine vietato, usa il termine preferito al suo posto.\n\
{glossary}\n\
Rispondi ESCLUSIVAMENTE con un oggetto JSON valido. Nessun testo prima o dopo il JSON.";

/// The user prompt for the article synthesis stage.
///
/// Defines the output contract: exact JSON keys, string-only content
/// fields, and the closed category set.
///
/// Placeholders: `{title}`, `{text}`
pub const SYNTHESIS_USER_PROMPT: &str = "Riscrivi questa notizia come un articolo originale e curato.\n\n\
# Notizia originale\nTitolo: {title}\n\nTesto:\n{text}\n\n\
# Formato di output\n\
Rispondi con un solo oggetto JSON con ESATTAMENTE queste chiavi:\n\
- \"title\": titolo in italiano\n\
- \"title_en\": titolo in inglese\n\
- \"summary\": riassunto in italiano (2-3 frasi)\n\
- \"summary_en\": riassunto in inglese (2-3 frasi)\n\
- \"content\": articolo completo in italiano, markdown, MINIMO 300 parole\n\
- \"content_en\": articolo completo in inglese, markdown, MINIMO 300 parole\n\
- \"category\": una tra \"LLM\", \"Frameworks\", \"Hardware\", \"Market\", \"Other\"\n\n\
Regole tassative:\n\
1. \"content\" e \"content_en\" DEVONO essere stringhe semplici. VIETATO usare oggetti annidati, liste JSON o altre strutture come valore di questi campi.\n\
2. Usa intestazioni markdown (##) dentro le stringhe di contenuto per strutturare l'articolo.\n\
3. Non inventare fatti assenti dal testo originale.";

// --- Answer Synthesis Prompts ---

/// The system prompt for grounded question answering.
pub const ANSWER_SYSTEM_PROMPT: &str = "Sei l'assistente di un archivio di notizie sull'intelligenza artificiale. \
Rispondi alla domanda dell'utente usando ESCLUSIVAMENTE gli articoli forniti nel contesto. \
Se il contesto non basta per rispondere, dillo apertamente invece di inventare. \
Chiudi sempre la risposta con una riga 'Fonti interne:' che elenca i titoli citati con il loro numero ordinale, ad esempio: Fonti interne: [1] Titolo A, [2] Titolo B.";

/// The user prompt for grounded question answering.
///
/// Placeholders: `{context}`, `{question}`
pub const ANSWER_USER_PROMPT: &str = "# Contesto\n{context}\n\n# Domanda\n{question}";

/// Returned by the answer engine when retrieval yields nothing; no model
/// call is made in that case.
pub const FALLBACK_ANSWER: &str = "Per ora non ho abbastanza articoli in archivio per rispondere a questa domanda. Riprova dopo il prossimo ciclo di aggiornamento.";

/// Terminology pairs always enforced, before any stored glossary terms.
pub const BUILTIN_GLOSSARY: &[(&str, &str)] = &[
    ("apprendimento automatico", "machine learning"),
    ("rete neurale artificiale", "rete neurale"),
    ("modello di linguaggio di grandi dimensioni", "LLM"),
    ("intelligenza artificiale generativa", "AI generativa"),
];
