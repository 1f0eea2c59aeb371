#![allow(dead_code)]

use std::path::Path;

use lopdf::{dictionary, Document, Object, Stream};

pub const A4: [i64; 4] = [0, 0, 595, 842];

/// Writes a PDF with one page per entry of `texts`. Font, resources and
/// MediaBox live on the page tree root so pages have to inherit them.
pub fn write_pdf(path: &Path, texts: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in texts {
        let content = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let media_box: Vec<Object> = A4.iter().map(|&v| Object::Integer(v)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => texts.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("write fixture pdf");
}

pub const CHALLENGES_YAML: &str = r#"
- name: tachadas
  strikeout: true
  min_per_page: 1
  max_per_page: 2
  lines:
    - Ir a clase en pijama
    - Comer sin cubiertos
    - Hablar en verso
- name: faciles
  max_per_page: 4
  lines:
    - Cantar el himno
    - Saltar en un pie
    - Decir un trabalenguas
    - Bailar cumbia
    - Imitar a un profesor
    - Contar un chiste
- name: dificiles
  max_per_page: 3
  lines:
    - Conseguir un autógrafo
    - Sacarse una foto con un perro
    - Hacer una torre de 5 vasos
    - Aprender a decir hola en 3 idiomas
    - Pedir la hora en alemán
"#;
