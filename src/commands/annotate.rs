use crate::annotation::{FeaturizedReadSets, GenotypeAnnotation, SeedPolicy};
use crate::cli::AnnotateArgs;
use crate::reads::{fetch_site_reads, AlignedRead};
use crate::utils::{open_bam_reader, open_likelihood_table, open_vcf_reader, LikelihoodTable, Result};
use crate::variant::{GenotypeAttributes, LikelihoodMatrix, VariantSite};
use crate::writers::VcfWriter;
use rayon::{iter::IntoParallelRefIterator, iter::ParallelIterator, ThreadPoolBuilder};
use rust_htslib::{
    bam,
    bcf::{self, header::HeaderView, Read},
};
use std::collections::HashSet;

/// A site with everything its annotation needs, detached from htslib handles.
struct SiteJob {
    site: VariantSite,
    likelihoods: Option<LikelihoodMatrix<AlignedRead>>,
}

#[derive(Debug, Default)]
struct RunStats {
    annotated: usize,
    skipped: usize,
}

struct Annotator<'a> {
    header: &'a HeaderView,
    bam: bam::IndexedReader,
    table: LikelihoodTable,
    annotation: FeaturizedReadSets,
    sample_idx: usize,
    sample_name: String,
    pool: rayon::ThreadPool,
}

impl Annotator<'_> {
    fn prepare(&mut self, record: &bcf::Record) -> Result<SiteJob> {
        let site = VariantSite::from_bcf_record(self.header, record)?;
        let Some(rows) = self.table.rows(&site.contig, site.start) else {
            return Ok(SiteJob {
                site,
                likelihoods: None,
            });
        };
        let names: HashSet<&str> = rows.iter().map(|r| r.read_name.as_str()).collect();
        let reads = fetch_site_reads(&mut self.bam, &site, |name| names.contains(name))?;
        let likelihoods = self.table.matrix_for(&site, reads)?;
        Ok(SiteJob { site, likelihoods })
    }

    /// Annotates a batch of records in parallel and writes them in input order.
    fn process_batch(
        &mut self,
        batch: &mut Vec<bcf::Record>,
        writer: &mut VcfWriter,
        stats: &mut RunStats,
    ) -> Result<()> {
        let jobs = batch
            .iter()
            .map(|record| self.prepare(record))
            .collect::<Result<Vec<_>>>()?;

        let annotation = &self.annotation;
        let sample_name = self.sample_name.as_str();
        let results: Vec<Result<GenotypeAttributes>> = self.pool.install(|| {
            jobs.par_iter()
                .map(|job| run_job(annotation, sample_name, job))
                .collect()
        });

        for (record, result) in batch.iter_mut().zip(results) {
            let genotype = result?;
            if genotype.is_empty() {
                stats.skipped += 1;
            } else {
                stats.annotated += 1;
            }
            writer.write(record, self.sample_idx, &genotype)?;
        }
        batch.clear();
        Ok(())
    }
}

fn run_job(
    annotation: &FeaturizedReadSets,
    sample_name: &str,
    job: &SiteJob,
) -> Result<GenotypeAttributes> {
    let mut genotype = GenotypeAttributes::new(sample_name);
    annotation.annotate_genotype(&job.site, &mut genotype, job.likelihoods.as_ref())?;
    Ok(genotype)
}

fn resolve_sample(header: &HeaderView, name: Option<&str>) -> Result<(usize, String)> {
    match name {
        Some(name) => header
            .sample_id(name.as_bytes())
            .map(|idx| (idx, name.to_string()))
            .ok_or_else(|| format!("Sample {} is not in the VCF", name)),
        None => header
            .samples()
            .first()
            .map(|s| (0, String::from_utf8_lossy(s).into_owned()))
            .ok_or_else(|| "VCF has no samples".to_string()),
    }
}

fn initialize_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    log::debug!(
        "Initializing annotation thread pool with {} threads...",
        num_threads
    );
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("frs-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}

pub fn annotate(args: AnnotateArgs) -> Result<()> {
    let table = open_likelihood_table(&args.likelihoods_src)?;
    let mut vcf_reader = open_vcf_reader(&args.bcf_src)?;
    let header = vcf_reader.header().clone();
    let (sample_idx, sample_name) = resolve_sample(&header, args.sample_name.as_deref())?;
    log::info!("Annotating sample {}", sample_name);

    let seed = match args.seed {
        Some(seed) => SeedPolicy::Fixed(seed),
        None => SeedPolicy::Entropy,
    };
    let annotation = FeaturizedReadSets::new(args.max_ref_count)
        .with_default_base_quality(args.default_base_quality)
        .with_seed(seed);

    let mut writer = VcfWriter::new(&header, &annotation.descriptors(), &args.output_path)?;
    let mut annotator = Annotator {
        header: &header,
        bam: open_bam_reader(&args.reads_src, 1)?,
        table,
        annotation,
        sample_idx,
        sample_name,
        pool: initialize_thread_pool(args.num_threads)?,
    };

    let mut stats = RunStats::default();
    let mut batch = Vec::with_capacity(args.batch_size);
    for record in vcf_reader.records() {
        let record = record.map_err(|e| format!("Failed to read VCF record: {}", e))?;
        batch.push(record);
        if batch.len() >= args.batch_size {
            annotator.process_batch(&mut batch, &mut writer, &mut stats)?;
        }
    }
    if !batch.is_empty() {
        annotator.process_batch(&mut batch, &mut writer, &mut stats)?;
    }
    writer.finish()?;

    log::info!(
        "Annotated {} sites, skipped {} without likelihoods",
        stats.annotated,
        stats.skipped
    );
    Ok(())
}
