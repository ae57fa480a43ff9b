//! Print or write sitemap.xml and robots.txt

use anyhow::Result;
use std::path::Path;

use crate::generator::Generator;
use crate::Carnet;

/// Print sitemap.xml, or write both files into `output`
pub fn run(carnet: &Carnet, output: Option<&Path>) -> Result<()> {
    let generator = Generator::new(carnet);

    match output {
        Some(dir) => {
            let dir = if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                carnet.base_dir.join(dir)
            };
            generator.write(&dir)?;
            println!("Wrote sitemap.xml and robots.txt to {:?}", dir);
        }
        None => print!("{}", generator.sitemap()),
    }

    Ok(())
}

pub fn robots(carnet: &Carnet) -> Result<()> {
    print!("{}", Generator::new(carnet).robots());
    Ok(())
}
